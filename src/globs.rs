//! Glob matching for dirty-file filtering.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::errors::OptionsError;

/// Compiled any-of combination of the configured file patterns.
///
/// A path is relevant when any pattern matches it. A pattern without a path
/// separator is also matched against the path's file name alone, so nested
/// paths match a bare `*.scss` pattern. `*` never crosses a separator; `**`
/// is the only way to span directories.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile the given patterns, rejecting the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = Pattern::new(raw).map_err(|source| OptionsError::InvalidPattern {
                pattern: raw.to_string(),
                source,
            })?;
            compiled.push(pattern);
        }
        Ok(Self { patterns: compiled })
    }

    pub fn matches(&self, path: &Path) -> bool {
        let options = match_options();
        self.patterns.iter().any(|pattern| {
            if pattern.matches_path_with(path, options) {
                return true;
            }
            // Separator-free patterns also match the file name alone
            if !pattern.as_str().contains('/')
                && let Some(name) = path.file_name()
            {
                return pattern.matches_with(&name.to_string_lossy(), options);
            }
            false
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    }
}
