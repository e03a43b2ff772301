//! Per-record stage contract and the stream adapter that drives it.
//!
//! A stage sees one record at a time and either forwards it or raises a
//! terminal error. After the first error (its own or one from upstream) the
//! adapter yields nothing more.

use crate::error::Result;
use crate::max_warnings::MaxWarnings;
use crate::obs;
use crate::record::FileRecord;
use crate::reporter::{ReportFormat, Reporter};
use crate::threshold::Threshold;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::io::Write;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream of records as seen between stages.
pub type RecordStream = BoxStream<'static, Result<FileRecord>>;

/// A synchronous pipeline stage.
pub trait RecordStage: Send + 'static {
    /// Stage name used in logs.
    fn name(&self) -> &'static str;

    /// Handle one record, forwarding it or failing the stream.
    fn process(&mut self, record: FileRecord) -> Result<FileRecord>;

    /// Called once when upstream completes normally.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Stream adapter running `stage` over `input`.
pub struct Piped<S> {
    input: RecordStream,
    stage: S,
    done: bool,
    records: u64,
}

// The stage is never pinned; only `input` is polled, and it is boxed.
impl<S> Unpin for Piped<S> {}

impl<S: RecordStage> Piped<S> {
    pub fn new(input: RecordStream, stage: S) -> Self {
        Self {
            input,
            stage,
            done: false,
            records: 0,
        }
    }

    /// Stop for good and release everything upstream.
    fn halt(&mut self) {
        self.done = true;
        self.input = stream::empty().boxed();
    }
}

impl<S: RecordStage> Stream for Piped<S> {
    type Item = Result<FileRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        match this.input.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(record))) => {
                this.records += 1;
                match this.stage.process(record) {
                    Ok(record) => Poll::Ready(Some(Ok(record))),
                    Err(err) => {
                        this.halt();
                        obs::emit_stage_failed(this.stage.name(), &err);
                        Poll::Ready(Some(Err(err)))
                    }
                }
            }
            Poll::Ready(Some(Err(upstream))) => {
                this.halt();
                Poll::Ready(Some(Err(upstream)))
            }
            Poll::Ready(None) => {
                this.done = true;
                match this.stage.finish() {
                    Ok(()) => {
                        obs::emit_stage_finished(this.stage.name(), this.records);
                        Poll::Ready(None)
                    }
                    Err(err) => {
                        obs::emit_stage_failed(this.stage.name(), &err);
                        Poll::Ready(Some(Err(err)))
                    }
                }
            }
        }
    }
}

/// Composition helpers for record streams.
pub trait RecordStreamExt: Stream<Item = Result<FileRecord>> + Send + Sized + 'static {
    /// Run an arbitrary stage over this stream.
    fn pipe<S: RecordStage>(self, stage: S) -> RecordStream {
        Piped::new(self.boxed(), stage).boxed()
    }

    /// Write human-readable or JSON diagnostics to `writer`.
    fn report<W: Write + Send + 'static>(self, writer: W, format: ReportFormat) -> RecordStream {
        self.pipe(Reporter::new(writer, format))
    }

    /// Fail on the first record carrying an error diagnostic.
    fn fail_on_error(self) -> RecordStream {
        self.pipe(Threshold::fail_on_error())
    }

    /// Fail on the first record carrying a warning diagnostic.
    fn fail_on_warning(self) -> RecordStream {
        self.pipe(Threshold::fail_on_warning())
    }

    /// Fail at end of stream if total warnings exceed `max`.
    fn max_warnings(self, max: usize) -> RecordStream {
        self.pipe(MaxWarnings::new(max))
    }
}

impl<T> RecordStreamExt for T where T: Stream<Item = Result<FileRecord>> + Send + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LintError;
    use futures::stream;

    /// Fails on the record whose path is `trip`, and again at finish.
    struct Tripwire {
        trip: &'static str,
    }

    impl RecordStage for Tripwire {
        fn name(&self) -> &'static str {
            "tripwire"
        }

        fn process(&mut self, record: FileRecord) -> Result<FileRecord> {
            if record.path().to_str() == Some(self.trip) {
                return Err(LintError::configuration("tripped"));
            }
            Ok(record)
        }

        fn finish(&mut self) -> Result<()> {
            Err(LintError::configuration("finished"))
        }
    }

    fn records(paths: &[&'static str]) -> RecordStream {
        let items: Vec<Result<FileRecord>> =
            paths.iter().map(|p| Ok(FileRecord::null(*p))).collect();
        stream::iter(items).boxed()
    }

    #[tokio::test]
    async fn test_stage_error_terminates_stream() {
        let out: Vec<_> = records(&["a", "b", "c"])
            .pipe(Tripwire { trip: "b" })
            .collect()
            .await;
        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert_eq!(out[1].as_ref().expect_err("tripped").message(), "tripped");
    }

    #[tokio::test]
    async fn test_finish_error_is_last_item() {
        let out: Vec<_> = records(&["a"])
            .pipe(Tripwire { trip: "none" })
            .collect()
            .await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].as_ref().expect_err("finish").message(), "finished");
    }

    #[tokio::test]
    async fn test_upstream_error_passes_through_without_finish() {
        let input = stream::iter(vec![
            Ok(FileRecord::null("a")),
            Err(LintError::Closed),
            Ok(FileRecord::null("b")),
        ])
        .boxed();
        let out: Vec<_> = input
            .pipe(Tripwire { trip: "none" })
            .collect()
            .await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].as_ref().expect_err("upstream"), &LintError::Closed);
    }
}
