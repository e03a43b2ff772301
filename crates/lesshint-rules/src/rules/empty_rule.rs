use super::{Finding, Rule};
use crate::source::Source;
use lesshint_stream::Severity;

const MESSAGE: &str = "There shouldn't be any empty rules present.";

/// Blocks with nothing but whitespace or comments inside.
pub struct EmptyRule;

impl Rule for EmptyRule {
    fn name(&self) -> &'static str {
        "emptyRule"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, source: &Source<'_>) -> Vec<Finding> {
        let masked = source.masked();
        source
            .blocks()
            .iter()
            .filter(|block| !block.interpolation)
            .filter(|block| masked[block.open + 1..block.close].iter().all(u8::is_ascii_whitespace))
            .map(|block| Finding::new(block.open, MESSAGE))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::findings;

    #[test]
    fn test_empty_and_comment_only_blocks() {
        assert_eq!(findings(&EmptyRule, ".a {}\n.b { /* todo */ }"), vec![(1, 4), (2, 4)]);
    }

    #[test]
    fn test_nested_blocks_are_not_empty() {
        let source = ".a { .b { color: red; } }\n.@{x} { color: red; }";
        assert!(findings(&EmptyRule, source).is_empty());
    }
}
