//! Lint result types attached to file records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single rule violation reported by the lint engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,

    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (1-indexed).
    pub column: u32,

    /// Rule identifier (e.g. "spaceBeforeBrace").
    pub rule: String,

    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        line: u32,
        column: u32,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            line,
            column,
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn error(
        line: u32,
        column: u32,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, line, column, rule, message)
    }

    pub fn warning(
        line: u32,
        column: u32,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, line, column, rule, message)
    }
}

/// Diagnostics produced for one file record.
///
/// `success` is derived from `messages` at construction and the fields are
/// read-only afterwards, so `success == !messages.any(error)` always holds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    file_path: String,
    messages: Vec<Diagnostic>,
    success: bool,
}

impl LintResult {
    /// Build a result, keeping `messages` in engine order.
    pub fn new(file_path: impl Into<String>, messages: Vec<Diagnostic>) -> Self {
        let success = !messages.iter().any(|m| m.severity == Severity::Error);
        Self {
            file_path: file_path.into(),
            messages,
            success,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    /// True iff no diagnostic has error severity.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Number of diagnostics of the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Total number of diagnostics.
    pub fn result_count(&self) -> usize {
        self.messages.len()
    }

    /// First diagnostic of the given severity, in message order.
    pub fn first(&self, severity: Severity) -> Option<&Diagnostic> {
        self.messages.iter().find(|m| m.severity == severity)
    }
}
