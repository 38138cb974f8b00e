//! Default lint engine adapter.
//!
//! Spawns a stylelint-compatible CLI with `--formatter json` and parses the
//! per-file result array from stdout:
//! - exit code 2 (violations found) is a normal outcome, the JSON is authoritative
//! - unparseable stdout is an engine failure carrying the process stderr
//! - an empty file set short-circuits without spawning anything

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tokio::process::Command;

use super::LintEngine;
use super::types::{ConfigSource, FileResult, LintOutcome, LintRequest};
use async_trait::async_trait;

/// Lint engine backed by an external stylelint-compatible executable.
pub struct ProcessEngine {
    program: PathBuf,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessEngine {
    fn default() -> Self {
        Self::new("stylelint")
    }
}

#[async_trait]
impl LintEngine for ProcessEngine {
    async fn lint(&self, request: LintRequest) -> Result<LintOutcome> {
        if request.files.is_empty() {
            return Ok(LintOutcome::default());
        }

        let mut command = Command::new(&self.program);
        command.arg("--formatter").arg("json");
        match &request.config {
            ConfigSource::Discover => {}
            ConfigSource::File(path) => {
                command.arg("--config").arg(path);
            }
            ConfigSource::Inline(_) => {
                bail!(
                    "Inline lint configuration is not supported by the {} CLI; use a config file",
                    self.program.display()
                );
            }
        }
        command.args(&request.files);

        tracing::debug!(program = %self.program.display(), files = request.files.len(), "spawning lint engine");
        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to spawn lint engine: {}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match serde_json::from_str::<Vec<FileResult>>(stdout.trim()) {
            Ok(results) => Ok(LintOutcome { results }),
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = if stderr.trim().is_empty() {
                    stdout.trim()
                } else {
                    stderr.trim()
                };
                tracing::warn!(exit = output.status.code().unwrap_or(-1), "lint engine failed");
                bail!(
                    "Lint engine {} failed (exit {}): {}",
                    self.program.display(),
                    output.status.code().unwrap_or(-1),
                    detail
                )
            }
        }
    }
}
