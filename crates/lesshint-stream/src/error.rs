//! Fatal error taxonomy for the lint pipeline.
//!
//! Lint violations are never errors; they are data on a successfully linted
//! record. Every variant here terminates the stream that raised it.

use crate::result::Severity;
use std::fmt;

/// Class of a fatal pipeline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad config path, unreadable config, or unsupported record content.
    Configuration,
    /// The lint engine faulted while analyzing a file.
    Engine,
    /// A threshold stage saw a diagnostic of its target severity.
    LintThreshold,
    /// The run produced more warnings than allowed.
    MaxWarningsExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Engine => "EngineError",
            ErrorKind::LintThreshold => "LintThresholdError",
            ErrorKind::MaxWarningsExceeded => "MaxWarningsExceededError",
        };
        f.write_str(name)
    }
}

/// Terminal errors raised by pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LintError {
    #[error("{message}")]
    Configuration { message: String },

    #[error("{path}: {message}")]
    Engine { path: String, message: String },

    #[error("{}", threshold_message(.path, .severity, .count))]
    Threshold {
        path: String,
        severity: Severity,
        count: usize,
    },

    #[error("Failed with {count} warnings. Maximum allowed is {max}.")]
    MaxWarningsExceeded { count: usize, max: usize },

    #[error("record stream is closed")]
    Closed,
}

impl LintError {
    /// Name carried by every pipeline error, regardless of kind.
    pub const NAME: &'static str = "LesshintError";

    pub fn configuration(message: impl Into<String>) -> Self {
        LintError::Configuration {
            message: message.into(),
        }
    }

    pub fn engine(path: impl Into<String>, message: impl Into<String>) -> Self {
        LintError::Engine {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LintError::Configuration { .. } | LintError::Closed => ErrorKind::Configuration,
            LintError::Engine { .. } => ErrorKind::Engine,
            LintError::Threshold { .. } => ErrorKind::LintThreshold,
            LintError::MaxWarningsExceeded { .. } => ErrorKind::MaxWarningsExceeded,
        }
    }

    /// Human-readable detail, identical to `Display`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn threshold_message(path: &str, severity: &Severity, count: &usize) -> String {
    let plural = if *count == 1 { "" } else { "s" };
    format!("Failed with {count} {severity}{plural} in {path}.")
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, LintError>;
