//! Typed error hierarchy for the styleguard plugin.
//!
//! Two top-level enums cover the two failure surfaces:
//! - `CycleError` — per-build-cycle failures (engine rejection, fail-fast)
//! - `OptionsError` — configuration rejected at plugin construction

use thiserror::Error;

/// Fixed diagnostic emitted when `fail_on_error` aborts a build cycle.
///
/// The text is stable regardless of which or how many files triggered the
/// failure; hosts and tests match on it verbatim, trailing newline included.
pub const LINT_ERROR_MESSAGE: &str = "Failed because of a stylelint error.\n";

/// Failure signal for a single build cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Failed because of a stylelint error.\n")]
    LintErrors,

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

/// Errors reported once, when plugin options are resolved and validated.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
