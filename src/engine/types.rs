use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity attached to a single lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding inside a file, as reported by stylelint's JSON formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintWarning {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub rule: String,
    pub severity: Severity,
    pub text: String,
}

/// Per-file lint outcome.
///
/// The orchestration core only reads `errored` and whether `warnings` is
/// empty; the remaining fields feed the formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    #[serde(rename = "source", default)]
    pub path: PathBuf,
    #[serde(default)]
    pub errored: bool,
    #[serde(default)]
    pub warnings: Vec<LintWarning>,
}

impl FileResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Everything a lint engine produces for one invocation.
#[derive(Debug, Clone, Default)]
pub struct LintOutcome {
    pub results: Vec<FileResult>,
}

/// Where the engine should take its lint configuration from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Let the engine discover configuration on its own (`.stylelintrc`
    /// lookup and friends).
    #[default]
    Discover,
    /// Explicit path to a configuration file.
    File(PathBuf),
    /// Inline configuration forwarded to the engine as-is.
    Inline(serde_json::Value),
}

/// One engine invocation: the files to lint plus the configuration source.
#[derive(Debug, Clone)]
pub struct LintRequest {
    pub files: Vec<String>,
    pub config: ConfigSource,
}
