//! Whole-run warning budget, decided at end of stream.

use crate::error::{LintError, Result};
use crate::record::FileRecord;
use crate::stage::RecordStage;

/// Counts warnings across every record and fails at completion when the
/// total exceeds `max`. A total equal to `max` passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxWarnings {
    max: usize,
    count: usize,
}

impl MaxWarnings {
    pub fn new(max: usize) -> Self {
        Self { max, count: 0 }
    }

    /// Warnings seen so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl RecordStage for MaxWarnings {
    fn name(&self) -> &'static str {
        "max_warnings"
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord> {
        if let Some(result) = record.lint_result() {
            self.count += result.warning_count();
        }
        Ok(record)
    }

    fn finish(&mut self) -> Result<()> {
        if self.count > self.max {
            return Err(LintError::MaxWarningsExceeded {
                count: self.count,
                max: self.max,
            });
        }
        Ok(())
    }
}
