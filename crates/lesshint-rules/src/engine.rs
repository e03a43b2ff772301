//! Rule engine implementing the pipeline's lint engine seam.

use crate::rules::{self, Rule};
use crate::settings::RuleSetting;
use crate::source::Source;
use async_trait::async_trait;
use lesshint_stream::{Configuration, Diagnostic, EngineError, LintEngine};
use tracing::debug;

/// Runs a fixed list of rules over each source.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_rules(rules::all())
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Lint `source`, returning diagnostics sorted by line then column.
    pub fn check_source(
        &self,
        source: &str,
        config: &Configuration,
    ) -> Result<Vec<Diagnostic>, EngineError> {
        let parsed = Source::parse(source)?;
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let setting = RuleSetting::resolve(
                rule.name(),
                rule.default_severity(),
                config.rule(rule.name()),
            )?;
            if !setting.enabled {
                continue;
            }
            for finding in rule.check(&parsed) {
                let (line, column) = parsed.position(finding.offset);
                diagnostics.push(Diagnostic::new(
                    setting.severity,
                    line,
                    column,
                    rule.name(),
                    finding.message,
                ));
            }
        }
        diagnostics.sort_by_key(|d| (d.line, d.column));
        debug!(
            rules = self.rules.len(),
            diagnostics = diagnostics.len(),
            "Checked source"
        );
        Ok(diagnostics)
    }
}

#[async_trait]
impl LintEngine for RuleEngine {
    async fn check(
        &self,
        source: &str,
        config: &Configuration,
    ) -> Result<Vec<Diagnostic>, EngineError> {
        self.check_source(source, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesshint_stream::Severity;
    use serde_json::json;

    fn check(source: &str, config: serde_json::Value) -> Result<Vec<Diagnostic>, EngineError> {
        let config = Configuration::from_json(config).expect("config");
        RuleEngine::new().check_source(source, &config)
    }

    #[test]
    fn test_well_formed_source_is_clean() {
        assert!(check(".foo {\n color: red;\n}", json!({})).expect("lint").is_empty());
    }

    #[test]
    fn test_diagnostics_sorted_by_position() {
        let diagnostics = check(".foo{color:red !important;}", json!({})).expect("lint");
        let rules: Vec<_> = diagnostics.iter().map(|d| (d.column, d.rule.as_str())).collect();
        assert_eq!(
            rules,
            vec![
                (5, "spaceBeforeBrace"),
                (11, "spaceAfterPropertyColon"),
                (16, "importantRule"),
            ]
        );
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[2].severity, Severity::Warning);
    }

    #[test]
    fn test_configuration_disables_and_reclassifies() {
        let config = json!({
            "spaceBeforeBrace": false,
            "importantRule": { "severity": "error" }
        });
        let diagnostics = check(".foo{ color: red !important; }", config).expect("lint");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "importantRule");
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_unbalanced_source_is_an_engine_fault() {
        let err = check(".foo {\n}\n}", json!({})).expect_err("fault");
        assert_eq!(err.message, "3:1 Unexpected '}'");
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(
            RuleEngine::new().rule_names(),
            vec![
                "spaceBeforeBrace",
                "spaceAfterPropertyColon",
                "importantRule",
                "trailingWhitespace",
                "emptyRule"
            ]
        );
    }
}
