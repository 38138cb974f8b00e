//! Per-cycle lint orchestration.
//!
//! One `CompilationRunner::run` call is one build cycle:
//! 1. register the flush tap (independent of lint completion)
//! 2. await the engine; a rejection fails the cycle verbatim
//! 3. echo the formatted result list unless `quiet`
//! 4. classify into the per-cycle report
//! 5. fail fast with the fixed message when `fail_on_error` applies
//!
//! The flush tap pushes one formatted diagnostic per non-empty set into the
//! compilation and clears the set, so firing it again in the same cycle is a
//! no-op. Diagnostics therefore land in the collections even when step 5
//! fails the cycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classify::{ClassifiedResults, classify};
use crate::engine::{LintEngine, LintInvoker};
use crate::errors::CycleError;
use crate::formatter::Formatter;
use crate::host::{Compilation, LifecycleHooks};
use crate::options::LintOptions;

/// Side channel for echoing formatted results when `quiet` is off.
/// Real implementation: `StderrConsole`. Test doubles record the echoes.
pub trait Console: Send + Sync {
    fn echo(&self, rendered: &str);
}

/// Default console, writing to stderr. Blank renderings are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrConsole;

impl Console for StderrConsole {
    fn echo(&self, rendered: &str) {
        if !rendered.trim().is_empty() {
            eprintln!("{rendered}");
        }
    }
}

/// Runs the lint pass for one build cycle and wires its outcome into the
/// host's flush point.
#[derive(Clone)]
pub struct CompilationRunner {
    options: Arc<LintOptions>,
    invoker: LintInvoker,
    console: Arc<dyn Console>,
}

impl CompilationRunner {
    pub fn new(options: Arc<LintOptions>, engine: Arc<dyn LintEngine>) -> Self {
        let invoker = LintInvoker::new(engine, options.config.clone());
        Self {
            options,
            invoker,
            console: Arc::new(StderrConsole),
        }
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    /// Drive one cycle over `files`. The returned result is the cycle's
    /// completion signal.
    pub async fn run(&self, hooks: &LifecycleHooks, files: Vec<String>) -> Result<(), CycleError> {
        let report = CycleReport::default();
        self.register_flush(hooks, report.clone());

        let outcome = self.invoker.invoke(files).await?;

        if !self.options.quiet {
            let rendered = (self.options.formatter)(&outcome.results);
            self.console.echo(&rendered);
        }

        let classified = classify(outcome.results, self.options.emit_errors);
        let failing = self.options.fail_on_error && !classified.errors.is_empty();
        tracing::debug!(
            errors = classified.errors.len(),
            warnings = classified.warnings.len(),
            failing,
            "classified lint results"
        );
        report.fill(classified);

        if failing {
            return Err(CycleError::LintErrors);
        }
        Ok(())
    }

    fn register_flush(&self, hooks: &LifecycleHooks, report: CycleReport) {
        let formatter = self.options.formatter.clone();
        hooks.on_cycle_flush(
            self.options.flush_stage(),
            Box::new(move |compilation| report.flush_into(compilation, &formatter)),
        );
    }
}

/// Per-cycle diagnostic context shared between lint completion and the flush
/// tap. Created fresh for every runner invocation; never reused across
/// cycles, so stale taps from earlier cycles stay inert.
#[derive(Clone, Default)]
struct CycleReport {
    sets: Arc<Mutex<ClassifiedResults>>,
}

impl CycleReport {
    fn fill(&self, classified: ClassifiedResults) {
        *self.lock() = classified;
    }

    fn flush_into(&self, compilation: &mut Compilation, formatter: &Formatter) {
        let mut sets = self.lock();
        if !sets.warnings.is_empty() {
            tracing::trace!(files = sets.warnings.len(), "flushing warning diagnostics");
            compilation.warnings.push(formatter(&sets.warnings));
            sets.warnings.clear();
        }
        if !sets.errors.is_empty() {
            tracing::trace!(files = sets.errors.len(), "flushing error diagnostics");
            compilation.errors.push(formatter(&sets.errors));
            sets.errors.clear();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClassifiedResults> {
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
