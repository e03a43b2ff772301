//! Pipeline configuration surface.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bound on lint invocations in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Options recognized by the lint stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintOptions {
    /// Explicit configuration location. Resolved once, when the stage starts.
    pub config_path: Option<PathBuf>,

    /// Maximum warnings allowed across the run. `None` is unbounded.
    pub max_warnings: Option<usize>,

    /// Maximum number of records linted concurrently.
    pub concurrency: usize,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            max_warnings: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl LintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_max_warnings(mut self, max: usize) -> Self {
        self.max_warnings = Some(max);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// In-flight bound actually used; never zero.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unbounded() {
        let options = LintOptions::default();
        assert!(options.config_path.is_none());
        assert!(options.max_warnings.is_none());
        assert_eq!(options.effective_concurrency(), DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_deserializes_camel_case_keys() {
        let options: LintOptions =
            serde_json::from_str(r#"{ "configPath": "./test/config.json", "maxWarnings": 1 }"#)
                .expect("deserialize");
        assert_eq!(options.config_path, Some(PathBuf::from("./test/config.json")));
        assert_eq!(options.max_warnings, Some(1));
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        assert_eq!(LintOptions::new().with_concurrency(0).effective_concurrency(), 1);
    }
}
