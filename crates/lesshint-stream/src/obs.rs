//! Structured tracing events for pipeline lifecycle.
//!
//! Events are emitted at `debug!`/`info!` level; the host decides the
//! subscriber and filter.

use crate::error::LintError;
use tracing::{debug, info, warn};

/// Emit event: a record was linted and its result attached.
pub fn emit_record_linted(path: &str, errors: usize, warnings: usize) {
    debug!(event = "lint.record_linted", path = %path, errors = errors, warnings = warnings);
}

/// Emit event: a record was forwarded without linting.
pub fn emit_record_skipped(path: &str, reason: &'static str) {
    debug!(event = "lint.record_skipped", path = %path, reason = reason);
}

/// Emit event: a stage raised its terminal error.
pub fn emit_stage_failed(stage: &str, error: &LintError) {
    warn!(event = "stage.failed", stage = %stage, kind = %error.kind(), error = %error);
}

/// Emit event: a stage saw normal end of input.
pub fn emit_stage_finished(stage: &str, records: u64) {
    info!(event = "stage.finished", stage = %stage, records = records);
}
