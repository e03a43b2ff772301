//! Per-rule settings read from the configuration's rule entries.
//!
//! An entry is either a bare boolean (`"importantRule": false`) or an object
//! with optional `enabled` and `severity` keys. Other keys inside the object
//! are left for rule-specific options and ignored here.

use lesshint_stream::{EngineError, Severity};
use serde::Deserialize;
use serde_json::Value;

/// Effective setting for one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSetting {
    pub enabled: bool,
    pub severity: Severity,
}

#[derive(Debug, Deserialize)]
struct RawSetting {
    enabled: Option<bool>,
    severity: Option<Severity>,
}

impl RuleSetting {
    pub fn new(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
        }
    }

    /// Apply a configuration entry over the rule's defaults.
    pub fn resolve(
        name: &str,
        default: Severity,
        entry: Option<&Value>,
    ) -> Result<Self, EngineError> {
        let mut setting = Self::new(default);
        match entry {
            None | Some(Value::Null) => {}
            Some(Value::Bool(enabled)) => setting.enabled = *enabled,
            Some(value @ Value::Object(_)) => {
                let raw = RawSetting::deserialize(value).map_err(|e| {
                    EngineError::new(format!("Invalid settings for rule '{}': {}", name, e))
                })?;
                if let Some(enabled) = raw.enabled {
                    setting.enabled = enabled;
                }
                if let Some(severity) = raw.severity {
                    setting.severity = severity;
                }
            }
            Some(other) => {
                return Err(EngineError::new(format!(
                    "Invalid settings for rule '{}': expected a boolean or an object, got {}",
                    name, other
                )))
            }
        }
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_entry_keeps_defaults() {
        let setting = RuleSetting::resolve("emptyRule", Severity::Warning, None).expect("resolve");
        assert_eq!(setting, RuleSetting::new(Severity::Warning));
    }

    #[test]
    fn test_bare_boolean_toggles_rule() {
        let entry = json!(false);
        let setting = RuleSetting::resolve("importantRule", Severity::Warning, Some(&entry))
            .expect("resolve");
        assert!(!setting.enabled);
    }

    #[test]
    fn test_object_overrides_severity_and_keeps_other_keys() {
        let entry = json!({ "severity": "error", "style": "one_space" });
        let setting = RuleSetting::resolve("importantRule", Severity::Warning, Some(&entry))
            .expect("resolve");
        assert!(setting.enabled);
        assert_eq!(setting.severity, Severity::Error);
    }

    #[test]
    fn test_invalid_entries_are_engine_faults() {
        let entry = json!("loud");
        let err = RuleSetting::resolve("importantRule", Severity::Warning, Some(&entry))
            .expect_err("string");
        assert!(err.message.contains("importantRule"));

        let entry = json!({ "severity": "fatal" });
        assert!(RuleSetting::resolve("importantRule", Severity::Warning, Some(&entry)).is_err());
    }
}
