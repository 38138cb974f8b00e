//! Severity partitioning of lint results.

use crate::engine::FileResult;

/// Per-cycle diagnostic sets awaiting flush into the host's collections.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedResults {
    pub errors: Vec<FileResult>,
    pub warnings: Vec<FileResult>,
}

impl ClassifiedResults {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Partition lint results into error and warning sets.
///
/// With `emit_errors` set, files flagged `errored` become errors and files
/// that merely carry warnings become warnings. With `emit_errors` unset,
/// every result with findings is downgraded to a warning and the error set
/// stays empty. The partition is stable (input order preserved) and strict:
/// no file appears in both sets, files without findings appear in neither.
pub fn classify(results: Vec<FileResult>, emit_errors: bool) -> ClassifiedResults {
    let mut classified = ClassifiedResults::default();
    for result in results {
        if !emit_errors {
            if result.errored || result.has_warnings() {
                classified.warnings.push(result);
            }
        } else if result.errored {
            classified.errors.push(result);
        } else if result.has_warnings() {
            classified.warnings.push(result);
        }
    }
    classified
}
