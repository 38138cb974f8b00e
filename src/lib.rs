pub mod classify;
pub mod config;
pub mod engine;
pub mod errors;
pub mod formatter;
pub mod globs;
pub mod host;
pub mod options;
pub mod plugin;
pub mod runner;
pub mod tracker;
