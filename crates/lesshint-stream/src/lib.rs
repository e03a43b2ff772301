//! Streaming lint pipeline for LESS sources.
//!
//! Records flow through composable stages:
//!
//! ```text
//! records -> lint -> report -> fail_on_error / fail_on_warning -> max_warnings
//! ```
//!
//! `lint` attaches a [`LintResult`] to each record while keeping input order,
//! the reporter prints diagnostics, and the threshold stages turn diagnostics
//! into pipeline failures. The lint engine and configuration lookup are
//! injected through [`LintEngine`] and [`ConfigResolver`].

pub mod config;
pub mod engine;
pub mod error;
pub mod fakes;
pub mod lint;
pub mod max_warnings;
pub mod obs;
pub mod options;
pub mod record;
pub mod reporter;
pub mod result;
pub mod stage;
pub mod threshold;

pub use config::{
    ConfigResolver, Configuration, ExclusionSet, FsConfigResolver, CONVENTIONAL_CONFIG_FILE,
};
pub use engine::{EngineError, LintEngine};
pub use error::{ErrorKind, LintError, Result};
pub use lint::{lint, LintStage, LintStream};
pub use max_warnings::MaxWarnings;
pub use options::{LintOptions, DEFAULT_CONCURRENCY};
pub use record::{record_channel, Content, FileRecord, RecordSender, StreamingSource};
pub use reporter::{ReportFormat, Reporter, Totals};
pub use result::{Diagnostic, LintResult, Severity};
pub use stage::{Piped, RecordStage, RecordStream, RecordStreamExt};
pub use threshold::Threshold;
