//! Rule contract and the built-in rule set.

mod empty_rule;
mod important_rule;
mod space_after_property_colon;
mod space_before_brace;
mod trailing_whitespace;

pub use empty_rule::EmptyRule;
pub use important_rule::ImportantRule;
pub use space_after_property_colon::SpaceAfterPropertyColon;
pub use space_before_brace::SpaceBeforeBrace;
pub use trailing_whitespace::TrailingWhitespace;

use crate::source::Source;
use lesshint_stream::Severity;

/// A violation located by byte offset into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub offset: usize,
    pub message: String,
}

impl Finding {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// A single lint rule.
pub trait Rule: Send + Sync {
    /// Identifier used in configuration and diagnostics.
    fn name(&self) -> &'static str;

    /// Severity when the configuration does not override it.
    fn default_severity(&self) -> Severity;

    fn check(&self, source: &Source<'_>) -> Vec<Finding>;
}

/// Every built-in rule.
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SpaceBeforeBrace),
        Box::new(SpaceAfterPropertyColon),
        Box::new(ImportantRule),
        Box::new(TrailingWhitespace),
        Box::new(EmptyRule),
    ]
}

#[cfg(test)]
pub(crate) fn findings(rule: &dyn Rule, raw: &str) -> Vec<(u32, u32)> {
    let source = Source::parse(raw).expect("parse");
    rule.check(&source)
        .iter()
        .map(|f| source.position(f.offset))
        .collect()
}
