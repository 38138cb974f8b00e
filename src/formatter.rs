//! Rendering lint results into displayable diagnostics.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::engine::{FileResult, Severity};

/// Renders a result list into one diagnostic string.
///
/// Installed per plugin instance; the same formatter renders both the
/// console echo and the strings pushed into the host's collections.
pub type Formatter = Arc<dyn Fn(&[FileResult]) -> String + Send + Sync>;

/// The built-in formatter, following stylelint's string-formatter layout:
/// one block per file with findings, one line per finding. Files without
/// findings are skipped; an empty result list renders as an empty string.
pub fn string_formatter() -> Formatter {
    Arc::new(format_results)
}

fn format_results(results: &[FileResult]) -> String {
    let mut out = String::new();
    for result in results {
        if result.warnings.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&result.path.to_string_lossy());
        out.push('\n');
        for finding in &result.warnings {
            let symbol = match finding.severity {
                Severity::Error => "\u{2716}",  // ✖
                Severity::Warning => "\u{26A0}", // ⚠
            };
            let _ = writeln!(
                out,
                " {}:{}  {}  {}  {}",
                finding.line, finding.column, symbol, finding.text, finding.rule
            );
        }
    }
    out
}
