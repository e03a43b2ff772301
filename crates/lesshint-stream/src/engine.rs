//! Lint engine seam.

use crate::config::Configuration;
use crate::result::Diagnostic;
use async_trait::async_trait;

/// The engine itself faulted while analyzing a file.
///
/// Distinct from the file having violations: those are `Diagnostic`s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Inspects source text and produces diagnostics.
///
/// Implementations must be a pure function of text and configuration; the
/// lint stage may run several checks concurrently.
#[async_trait]
pub trait LintEngine: Send + Sync {
    async fn check(
        &self,
        source: &str,
        config: &Configuration,
    ) -> std::result::Result<Vec<Diagnostic>, EngineError>;
}
