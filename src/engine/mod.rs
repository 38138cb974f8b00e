//! Lint engine boundary.
//!
//! - `types` — serde types crossing the engine boundary
//! - `process` — default engine adapter spawning a stylelint-compatible CLI
//!
//! The orchestration core talks to engines exclusively through `LintEngine`
//! and `LintInvoker`; everything else in this module is plumbing for the
//! default adapter.

pub mod process;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub use process::ProcessEngine;
pub use types::{ConfigSource, FileResult, LintOutcome, LintRequest, LintWarning, Severity};

/// Abstraction over the linting engine for testability.
/// Real implementation: `ProcessEngine`. Test doubles: plain fakes.
#[async_trait]
pub trait LintEngine: Send + Sync {
    async fn lint(&self, request: LintRequest) -> Result<LintOutcome>;
}

/// Binds an engine to the resolved configuration source.
///
/// `invoke` issues exactly one engine call; a rejection is final for the
/// current build cycle (no retries) and an empty file set is legal.
#[derive(Clone)]
pub struct LintInvoker {
    engine: Arc<dyn LintEngine>,
    config: ConfigSource,
}

impl LintInvoker {
    pub fn new(engine: Arc<dyn LintEngine>, config: ConfigSource) -> Self {
        Self { engine, config }
    }

    pub async fn invoke(&self, files: Vec<String>) -> Result<LintOutcome> {
        tracing::debug!(files = files.len(), "invoking lint engine");
        self.engine
            .lint(LintRequest {
                files,
                config: self.config.clone(),
            })
            .await
    }
}
