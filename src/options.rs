//! Plugin configuration surface and defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::OptionsFile;
use crate::engine::ConfigSource;
use crate::errors::OptionsError;
use crate::formatter::{Formatter, string_formatter};
use crate::globs::PatternSet;
use crate::host::FlushStage;

/// Default patterns: every SCSS and Sass file under the context.
pub const DEFAULT_FILE_PATTERNS: &[&str] = &["**/*.scss", "**/*.sass"];

/// Resolved, validated options for one plugin instance.
///
/// Immutable for the lifetime of the plugin; built once by
/// `LintOptionsBuilder::build`, which is also the validation point for file
/// patterns.
#[derive(Clone)]
pub struct LintOptions {
    /// Patterns resolved against the context directory.
    pub files: Vec<String>,
    pub context: PathBuf,
    pub config: ConfigSource,
    pub quiet: bool,
    pub fail_on_error: bool,
    pub emit_errors: bool,
    pub lint_dirty_modules_only: bool,
    pub formatter: Formatter,
    patterns: PatternSet,
}

impl LintOptions {
    pub fn builder() -> LintOptionsBuilder {
        LintOptionsBuilder::default()
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Flush point selected by the error policy: emitted errors belong to
    /// the compile stage, downgraded ones to the emit stage.
    pub fn flush_stage(&self) -> FlushStage {
        if self.emit_errors {
            FlushStage::AfterCompile
        } else {
            FlushStage::AfterEmit
        }
    }
}

impl fmt::Debug for LintOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintOptions")
            .field("files", &self.files)
            .field("context", &self.context)
            .field("config", &self.config)
            .field("quiet", &self.quiet)
            .field("fail_on_error", &self.fail_on_error)
            .field("emit_errors", &self.emit_errors)
            .field("lint_dirty_modules_only", &self.lint_dirty_modules_only)
            .finish_non_exhaustive()
    }
}

/// Builder for `LintOptions`. Unset fields fall back to documented defaults
/// at `build` time:
/// - `files`: `**/*.scss` and `**/*.sass`
/// - `context`: the host's context directory
/// - `config`: engine-side discovery
/// - `formatter`: the built-in string formatter
/// - `quiet`, `fail_on_error`, `lint_dirty_modules_only`: false
/// - `emit_errors`: true (omitting it is equivalent to `true`)
#[derive(Clone, Default)]
pub struct LintOptionsBuilder {
    files: Option<Vec<String>>,
    context: Option<PathBuf>,
    config: Option<ConfigSource>,
    formatter: Option<Formatter>,
    quiet: Option<bool>,
    fail_on_error: Option<bool>,
    emit_errors: Option<bool>,
    lint_dirty_modules_only: Option<bool>,
}

impl LintOptionsBuilder {
    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn context(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context = Some(dir.into());
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(ConfigSource::File(path.into()));
        self
    }

    pub fn config_value(mut self, value: serde_json::Value) -> Self {
        self.config = Some(ConfigSource::Inline(value));
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = Some(fail);
        self
    }

    pub fn emit_errors(mut self, emit: bool) -> Self {
        self.emit_errors = Some(emit);
        self
    }

    pub fn lint_dirty_modules_only(mut self, dirty: bool) -> Self {
        self.lint_dirty_modules_only = Some(dirty);
        self
    }

    /// Layer file-based settings under everything set explicitly.
    pub fn merge_file(mut self, file: OptionsFile) -> Self {
        if self.files.is_none() {
            self.files = file.files;
        }
        if self.context.is_none() {
            self.context = file.context;
        }
        if self.config.is_none() {
            self.config = file.config_file.map(ConfigSource::File);
        }
        if self.quiet.is_none() {
            self.quiet = file.quiet;
        }
        if self.fail_on_error.is_none() {
            self.fail_on_error = file.fail_on_error;
        }
        if self.emit_errors.is_none() {
            self.emit_errors = file.emit_errors;
        }
        if self.lint_dirty_modules_only.is_none() {
            self.lint_dirty_modules_only = file.lint_dirty_modules_only;
        }
        self
    }

    /// Resolve against the host context and validate the patterns.
    pub fn build(self, default_context: &Path) -> Result<LintOptions, OptionsError> {
        let context = self
            .context
            .unwrap_or_else(|| default_context.to_path_buf());
        let raw = self.files.unwrap_or_else(|| {
            DEFAULT_FILE_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect()
        });
        let files: Vec<String> = raw
            .iter()
            .map(|pattern| resolve_pattern(&context, pattern))
            .collect();
        let patterns = PatternSet::new(&files)?;

        Ok(LintOptions {
            files,
            context,
            config: self.config.unwrap_or_default(),
            quiet: self.quiet.unwrap_or(false),
            fail_on_error: self.fail_on_error.unwrap_or(false),
            emit_errors: self.emit_errors.unwrap_or(true),
            lint_dirty_modules_only: self.lint_dirty_modules_only.unwrap_or(false),
            formatter: self.formatter.unwrap_or_else(string_formatter),
            patterns,
        })
    }
}

/// Relative patterns resolve under the context; absolute ones pass through.
fn resolve_pattern(context: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        context.join(pattern).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_under_the_host_context() {
        let options = LintOptions::builder().build(Path::new("/project")).unwrap();

        assert_eq!(options.files, vec!["/project/**/*.scss", "/project/**/*.sass"]);
        assert_eq!(options.context, PathBuf::from("/project"));
        assert!(options.emit_errors);
        assert!(!options.quiet);
        assert!(!options.fail_on_error);
        assert!(!options.lint_dirty_modules_only);
        assert!(matches!(options.config, ConfigSource::Discover));
    }

    #[test]
    fn explicit_context_wins_over_the_host_context() {
        let options = LintOptions::builder()
            .context("/elsewhere")
            .files(["*.scss"])
            .build(Path::new("/project"))
            .unwrap();

        assert_eq!(options.files, vec!["/elsewhere/*.scss"]);
    }

    #[test]
    fn absolute_patterns_pass_through_unchanged() {
        let options = LintOptions::builder()
            .files(["/shared/styles/**/*.scss"])
            .build(Path::new("/project"))
            .unwrap();

        assert_eq!(options.files, vec!["/shared/styles/**/*.scss"]);
    }

    #[test]
    fn emit_errors_selects_the_flush_stage() {
        let defaulted = LintOptions::builder().build(Path::new("/p")).unwrap();
        assert_eq!(defaulted.flush_stage(), FlushStage::AfterCompile);

        let downgraded = LintOptions::builder()
            .emit_errors(false)
            .build(Path::new("/p"))
            .unwrap();
        assert_eq!(downgraded.flush_stage(), FlushStage::AfterEmit);
    }

    #[test]
    fn invalid_patterns_fail_the_build() {
        let err = LintOptions::builder()
            .files(["styles/["])
            .build(Path::new("/project"))
            .unwrap_err();

        let OptionsError::InvalidPattern { pattern, .. } = err;
        assert!(pattern.contains("styles/["));
    }

    #[test]
    fn merge_file_layers_under_explicit_settings() {
        let file = OptionsFile {
            quiet: Some(false),
            fail_on_error: Some(true),
            files: Some(vec!["custom/*.scss".to_string()]),
            ..OptionsFile::default()
        };

        let options = LintOptions::builder()
            .quiet(true)
            .merge_file(file)
            .build(Path::new("/project"))
            .unwrap();

        // Explicit setting kept, file fills the gaps.
        assert!(options.quiet);
        assert!(options.fail_on_error);
        assert_eq!(options.files, vec!["/project/custom/*.scss"]);
    }

    #[test]
    fn resolved_options_match_their_own_patterns() {
        let options = LintOptions::builder().build(Path::new("/project")).unwrap();

        assert!(options.patterns().matches(Path::new("/project/styles/a.scss")));
        assert!(!options.patterns().matches(Path::new("/project/app.js")));
    }
}
