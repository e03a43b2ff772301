use super::{Finding, Rule};
use crate::source::Source;
use lesshint_stream::Severity;

const MESSAGE: &str = "Opening curly brace should be preceded by one space.";

/// `.foo {` rather than `.foo{` or `.foo  {`.
pub struct SpaceBeforeBrace;

impl Rule for SpaceBeforeBrace {
    fn name(&self) -> &'static str {
        "spaceBeforeBrace"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, source: &Source<'_>) -> Vec<Finding> {
        let masked = source.masked();
        source
            .blocks()
            .iter()
            .filter(|block| !block.interpolation)
            .filter(|block| !one_space_before(masked, block.open))
            .map(|block| Finding::new(block.open, MESSAGE))
            .collect()
    }
}

fn one_space_before(masked: &[u8], at: usize) -> bool {
    at >= 2 && masked[at - 1] == b' ' && !masked[at - 2].is_ascii_whitespace()
}
