use super::{Finding, Rule};
use crate::source::Source;
use lesshint_stream::Severity;

const MESSAGE: &str = "!important should not be used.";
const NEEDLE: &[u8] = b"!important";

pub struct ImportantRule;

impl Rule for ImportantRule {
    fn name(&self) -> &'static str {
        "importantRule"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, source: &Source<'_>) -> Vec<Finding> {
        source
            .masked()
            .windows(NEEDLE.len())
            .enumerate()
            .filter(|(_, window)| window.eq_ignore_ascii_case(NEEDLE))
            .map(|(offset, _)| Finding::new(offset, MESSAGE))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::findings;

    #[test]
    fn test_each_important_is_reported() {
        let raw = ".foo {\n    color: red !important;\n    margin: 0 !IMPORTANT;\n}";
        assert_eq!(findings(&ImportantRule, raw), vec![(2, 16), (3, 15)]);
    }

    #[test]
    fn test_comments_are_ignored() {
        assert!(findings(&ImportantRule, ".a { /* !important */ color: red; }").is_empty());
    }
}
