//! Plugin entry point: option resolution and hook registration.

use std::sync::Arc;

use crate::engine::{LintEngine, ProcessEngine};
use crate::errors::OptionsError;
use crate::host::BuildHost;
use crate::options::LintOptionsBuilder;
use crate::runner::{CompilationRunner, Console, StderrConsole};
use crate::tracker::DirtyTracker;

/// The stylesheet lint plugin.
///
/// Holds the raw option set plus the injectable collaborators; `apply`
/// resolves the options against the host's context, validates them once, and
/// registers a tap on the cycle-start point:
/// - default: lint the full configured file set every cycle
/// - `lint_dirty_modules_only`: track timestamps and lint only changed files
pub struct StyleguardPlugin {
    options: LintOptionsBuilder,
    engine: Arc<dyn LintEngine>,
    console: Arc<dyn Console>,
}

impl StyleguardPlugin {
    /// Plugin with the default engine: the `stylelint` CLI on PATH.
    pub fn new(options: LintOptionsBuilder) -> Self {
        Self {
            options,
            engine: Arc::new(ProcessEngine::default()),
            console: Arc::new(StderrConsole),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn LintEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    /// Resolve options against the host context and register lifecycle taps.
    pub fn apply(&self, host: &BuildHost) -> Result<(), OptionsError> {
        let options = Arc::new(self.options.clone().build(host.context())?);
        tracing::debug!(?options, "applying stylesheet lint plugin");
        let runner = CompilationRunner::new(options.clone(), self.engine.clone())
            .with_console(self.console.clone());

        if options.lint_dirty_modules_only {
            DirtyTracker::new(runner).apply(host.hooks());
        } else {
            let hooks = host.hooks().clone();
            let files = options.files.clone();
            host.hooks().on_cycle_start(Box::new(move |_snapshot| {
                let runner = runner.clone();
                let hooks = hooks.clone();
                let files = files.clone();
                Box::pin(async move { runner.run(&hooks, files).await })
            }));
        }
        Ok(())
    }
}
