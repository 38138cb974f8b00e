//! Loading plugin options from a `styleguard.toml` file.
//!
//! Every field is optional; anything set explicitly on the builder wins over
//! the file (see `LintOptionsBuilder::merge_file`). Example:
//!
//! ```toml
//! files = ["styles/**/*.scss", "styles/**/*.sass"]
//! config_file = ".stylelintrc.json"
//! quiet = false
//! fail_on_error = true
//! emit_errors = true
//! lint_dirty_modules_only = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const OPTIONS_FILE_NAME: &str = "styleguard.toml";

/// Plugin options as they appear on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsFile {
    pub files: Option<Vec<String>>,
    pub context: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub fail_on_error: Option<bool>,
    pub emit_errors: Option<bool>,
    pub lint_dirty_modules_only: Option<bool>,
}

impl OptionsFile {
    /// Load options from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load `styleguard.toml` from the given directory, falling back to
    /// defaults when the file does not exist.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(OPTIONS_FILE_NAME);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
