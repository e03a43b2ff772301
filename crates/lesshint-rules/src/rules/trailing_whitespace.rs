use super::{Finding, Rule};
use crate::source::Source;
use lesshint_stream::Severity;

const MESSAGE: &str = "Trailing whitespace.";

/// Spaces or tabs before a line break or end of input.
pub struct TrailingWhitespace;

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        "trailingWhitespace"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, source: &Source<'_>) -> Vec<Finding> {
        source
            .lines()
            .filter_map(|(start, line)| {
                let kept = line.trim_end_matches([' ', '\t']).len();
                (kept < line.len()).then(|| Finding::new(start + kept, MESSAGE))
            })
            .collect()
    }
}
