//! Reference lint engine for Less sources.
//!
//! Implements [`lesshint_stream::LintEngine`] with a small fixed rule set:
//!
//! | rule                      | default severity |
//! |---------------------------|------------------|
//! | `spaceBeforeBrace`        | error            |
//! | `spaceAfterPropertyColon` | error            |
//! | `importantRule`           | warning          |
//! | `trailingWhitespace`      | warning          |
//! | `emptyRule`               | warning          |
//!
//! Rules run over a masked copy of the source in which comments and string
//! literals are blanked out, so they never see text inside either.

pub mod engine;
pub mod rules;
pub mod settings;
pub mod source;

pub use engine::RuleEngine;
pub use rules::{Finding, Rule};
pub use settings::RuleSetting;
pub use source::{Block, Source, Statement};
