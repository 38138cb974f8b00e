//! Subcommand implementations for the styleguard binary.
//!
//! Both subcommands drive the plugin through the in-crate `BuildHost`:
//! - `lint`: one build cycle, diagnostics printed, non-zero exit on failure
//! - `watch`: repeated cycles over polled file timestamps

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use anyhow::{Context, Result};
use console::style;
use walkdir::WalkDir;

use styleguard::config::OptionsFile;
use styleguard::engine::ProcessEngine;
use styleguard::host::{BuildHost, Compilation, FileTimestamps, Timestamp};
use styleguard::options::LintOptions;
use styleguard::plugin::StyleguardPlugin;

use crate::Cli;

pub async fn cmd_lint(cli: &Cli) -> Result<()> {
    let (host, _context_dir) = prepare_host(cli, false)?;
    let mut compilation = Compilation::new();
    let result = host.run_cycle(&mut compilation).await;
    report_cycle(&compilation, result.is_ok());
    result.map_err(Into::into)
}

pub async fn cmd_watch(cli: &Cli, interval_ms: u64, dirty_only: bool) -> Result<()> {
    let (host, context_dir) = prepare_host(cli, dirty_only)?;
    let interval = Duration::from_millis(interval_ms.max(50));
    println!(
        "{} {}",
        style("Watching").cyan().bold(),
        context_dir.display()
    );

    loop {
        let mut compilation = Compilation::with_timestamps(scan_timestamps(&context_dir));
        match host.run_cycle(&mut compilation).await {
            Ok(()) => report_cycle(&compilation, false),
            Err(err) => {
                report_cycle(&compilation, false);
                eprintln!("{} {}", style("build failed:").red().bold(), err);
            }
        }
        tokio::time::sleep(interval).await;
    }
}

/// Resolve options (CLI flags over `styleguard.toml` over defaults), apply
/// the plugin, and hand back the ready host.
fn prepare_host(cli: &Cli, dirty: bool) -> Result<(BuildHost, PathBuf)> {
    let context_dir = match &cli.context {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let mut builder = LintOptions::builder();
    if !cli.files.is_empty() {
        builder = builder.files(cli.files.clone());
    }
    if let Some(config_file) = &cli.config_file {
        builder = builder.config_file(config_file);
    }
    if cli.quiet {
        builder = builder.quiet(true);
    }
    if cli.fail_on_error {
        builder = builder.fail_on_error(true);
    }
    if cli.no_emit_errors {
        builder = builder.emit_errors(false);
    }
    if dirty {
        builder = builder.lint_dirty_modules_only(true);
    }
    builder = builder.merge_file(OptionsFile::load_or_default(&context_dir)?);

    let host = BuildHost::new(&context_dir);
    StyleguardPlugin::new(builder)
        .with_engine(Arc::new(ProcessEngine::new(&cli.stylelint)))
        .apply(&host)?;
    Ok((host, context_dir))
}

fn report_cycle(compilation: &Compilation, clean_pass: bool) {
    for warning in &compilation.warnings {
        println!("{}", style("warning").yellow().bold());
        println!("{warning}");
    }
    for error in &compilation.errors {
        println!("{}", style("error").red().bold());
        println!("{error}");
    }
    if clean_pass && compilation.warnings.is_empty() && compilation.errors.is_empty() {
        println!("{}", style("No stylesheet problems found").green());
    }
}

/// Walk the context directory and capture file mtimes in epoch milliseconds.
/// Hidden directories (e.g. `.git`) are skipped.
fn scan_timestamps(context: &Path) -> FileTimestamps {
    let mut timestamps = FileTimestamps::new();
    let walker = WalkDir::new(context).into_iter().filter_entry(|entry| {
        entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
    });
    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(metadata) = entry.metadata()
            && let Ok(modified) = metadata.modified()
            && let Ok(elapsed) = modified.duration_since(UNIX_EPOCH)
        {
            timestamps.insert(entry.into_path(), elapsed.as_millis() as Timestamp);
        }
    }
    timestamps
}
