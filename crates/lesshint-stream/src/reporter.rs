//! Diagnostic reporter stage.
//!
//! Writes one block per record with diagnostics and a summary at end of
//! stream. Output goes to an injected writer; write failures are logged and
//! never fail the stream.

use crate::error::Result;
use crate::record::FileRecord;
use crate::result::LintResult;
use crate::stage::RecordStage;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use tracing::warn;

/// Output format for the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Path header, then one indented line per diagnostic.
    #[default]
    Human,
    /// One JSON document per record, then a JSON summary line.
    Json,
}

/// Running totals across the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
}

impl Totals {
    fn add(&mut self, result: &LintResult) {
        self.errors += result.error_count();
        self.warnings += result.warning_count();
        self.files += 1;
    }

    /// Human summary line.
    pub fn summary(&self) -> String {
        if self.errors == 0 && self.warnings == 0 {
            return "No problems found.".to_string();
        }
        format!(
            "{} and {} found.",
            plural(self.errors, "error"),
            plural(self.warnings, "warning")
        )
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Observer stage formatting lint results.
pub struct Reporter<W> {
    out: W,
    format: ReportFormat,
    totals: Totals,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            totals: Totals::default(),
        }
    }

    pub fn human(out: W) -> Self {
        Self::new(out, ReportFormat::Human)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    fn write_result(&mut self, record: &FileRecord, result: &LintResult) -> io::Result<()> {
        match self.format {
            ReportFormat::Human => {
                writeln!(self.out, "{}", record.relative().display())?;
                for m in result.messages() {
                    let position = format!("{}:{}", m.line, m.column);
                    writeln!(
                        self.out,
                        "  {:<7} {:<7} {}: {}",
                        m.severity, position, m.rule, m.message
                    )?;
                }
                writeln!(self.out)
            }
            ReportFormat::Json => {
                let line = serde_json::to_string(result).map_err(io::Error::other)?;
                writeln!(self.out, "{}", line)
            }
        }
    }

    fn write_summary(&mut self) -> io::Result<()> {
        match self.format {
            ReportFormat::Human => writeln!(self.out, "{}", self.totals.summary())?,
            ReportFormat::Json => {
                let summary = json!({ "summary": self.totals });
                writeln!(self.out, "{}", summary)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> RecordStage for Reporter<W> {
    fn name(&self) -> &'static str {
        "reporter"
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord> {
        let Some(result) = record.lint_result() else {
            return Ok(record);
        };
        self.totals.add(result);
        if !result.messages().is_empty() {
            if let Err(e) = self.write_result(&record, result) {
                warn!(path = %record.display_path(), error = %e, "Failed to write lint report");
            }
        }
        Ok(record)
    }

    fn finish(&mut self) -> Result<()> {
        if let Err(e) = self.write_summary() {
            warn!(error = %e, "Failed to write lint summary");
        }
        Ok(())
    }
}
