//! Fail-fast severity thresholds.

use crate::error::{LintError, Result};
use crate::record::FileRecord;
use crate::result::Severity;
use crate::stage::RecordStage;

/// Fails the stream on the first record with a diagnostic of `target` severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    target: Severity,
}

impl Threshold {
    pub fn new(target: Severity) -> Self {
        Self { target }
    }

    pub fn fail_on_error() -> Self {
        Self::new(Severity::Error)
    }

    pub fn fail_on_warning() -> Self {
        Self::new(Severity::Warning)
    }
}

impl RecordStage for Threshold {
    fn name(&self) -> &'static str {
        match self.target {
            Severity::Error => "fail_on_error",
            Severity::Warning => "fail_on_warning",
        }
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord> {
        let Some(result) = record.lint_result() else {
            return Ok(record);
        };
        let count = result.count(self.target);
        if count > 0 {
            return Err(LintError::Threshold {
                path: result.file_path().to_string(),
                severity: self.target,
                count,
            });
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::result::{Diagnostic, LintResult};

    fn linted(path: &str, messages: Vec<Diagnostic>) -> FileRecord {
        let mut record = FileRecord::buffer(path, ".a {}");
        record.attach(LintResult::new(path, messages));
        record
    }

    #[test]
    fn test_error_threshold_trips_on_error() {
        let mut stage = Threshold::fail_on_error();
        let err = stage
            .process(linted(
                "a.less",
                vec![Diagnostic::error(2, 10, "spaceAfterPropertyColon", "m")],
            ))
            .expect_err("must trip");
        assert_eq!(err.kind(), ErrorKind::LintThreshold);
        assert_eq!(err.name(), "LesshintError");
    }

    #[test]
    fn test_error_threshold_ignores_warnings() {
        let mut stage = Threshold::fail_on_error();
        let record = linted("a.less", vec![Diagnostic::warning(2, 16, "importantRule", "m")]);
        assert!(stage.process(record).is_ok());
    }

    #[test]
    fn test_warning_threshold_ignores_errors() {
        let mut stage = Threshold::fail_on_warning();
        let record = linted("a.less", vec![Diagnostic::error(1, 5, "spaceBeforeBrace", "m")]);
        assert!(stage.process(record).is_ok());
    }

    #[test]
    fn test_warning_threshold_counts_matching_diagnostics() {
        let mut stage = Threshold::fail_on_warning();
        let record = linted(
            "b.less",
            vec![
                Diagnostic::warning(2, 16, "importantRule", "m"),
                Diagnostic::error(3, 1, "spaceBeforeBrace", "m"),
                Diagnostic::warning(4, 16, "importantRule", "m"),
            ],
        );
        match stage.process(record) {
            Err(LintError::Threshold {
                path,
                severity,
                count,
            }) => {
                assert_eq!(path, "b.less");
                assert_eq!(severity, Severity::Warning);
                assert_eq!(count, 2);
            }
            other => panic!("expected threshold error, got {:?}", other),
        }
    }

    #[test]
    fn test_records_without_result_pass_untouched() {
        let mut stage = Threshold::fail_on_error();
        let out = stage.process(FileRecord::null("dir")).expect("pass through");
        assert!(out.is_null());
        assert!(out.lint_result().is_none());
    }
}
