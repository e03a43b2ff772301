//! File records flowing through the pipeline, and the host-side record channel.

use crate::error::{LintError, Result};
use crate::result::LintResult;
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;

/// Live, non-materialized content source.
///
/// The pipeline never reads from it; a record carrying one is rejected.
#[derive(Clone)]
pub struct StreamingSource {
    _reader: Arc<Mutex<Box<dyn AsyncRead + Send + Unpin>>>,
}

impl StreamingSource {
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            _reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }
}

impl fmt::Debug for StreamingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StreamingSource(..)")
    }
}

/// Record content variants.
#[derive(Debug, Clone)]
pub enum Content {
    /// Fully materialized bytes.
    Buffer(Arc<[u8]>),
    /// No content, e.g. a directory placeholder.
    Null,
    /// Streaming source; unsupported by this pipeline.
    Streaming(StreamingSource),
}

/// One source file and its eventual lint outcome.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
    base: Option<PathBuf>,
    content: Content,
    lint_result: Option<Arc<LintResult>>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, content: Content) -> Self {
        Self {
            path: path.into(),
            base: None,
            content,
            lint_result: None,
        }
    }

    /// Record with materialized content.
    pub fn buffer(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self::new(path, Content::Buffer(Arc::from(bytes)))
    }

    /// Record with no content.
    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Content::Null)
    }

    /// Record backed by a live reader.
    pub fn streaming(
        path: impl Into<PathBuf>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self::new(path, Content::Streaming(StreamingSource::new(reader)))
    }

    /// Set the base directory used for display-relative paths.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, Content::Null)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.content, Content::Streaming(_))
    }

    /// Path relative to `base` when possible, otherwise the full path.
    pub fn relative(&self) -> &Path {
        self.base
            .as_deref()
            .and_then(|base| self.path.strip_prefix(base).ok())
            .unwrap_or(&self.path)
    }

    /// Display form of the path, used for correlation and reporting.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn lint_result(&self) -> Option<&LintResult> {
        self.lint_result.as_deref()
    }

    /// Fail unless the content can be handed to the lint stage.
    pub fn ensure_lintable(&self) -> Result<()> {
        if self.is_streaming() {
            return Err(LintError::configuration(format!(
                "Streaming content is not supported: {}",
                self.path.display()
            )));
        }
        if self.lint_result.is_some() {
            return Err(LintError::configuration(format!(
                "Record has already been linted: {}",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Source text, decoded lossily. `None` for non-buffer content.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Content::Buffer(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Content::Null | Content::Streaming(_) => None,
        }
    }

    /// Attach the lint result. A record is linted at most once.
    pub(crate) fn attach(&mut self, result: LintResult) {
        debug_assert!(self.lint_result.is_none(), "lint result attached twice");
        if self.lint_result.is_none() {
            self.lint_result = Some(Arc::new(result));
        }
    }
}

/// Host-side writer into a bounded record channel.
#[derive(Debug, Clone)]
pub struct RecordSender {
    tx: mpsc::Sender<FileRecord>,
}

impl RecordSender {
    /// Queue a record for the pipeline.
    ///
    /// Streaming content is rejected before anything is queued. Waits while
    /// the channel is full and reports `Closed` once the pipeline stopped.
    pub async fn write(&self, record: FileRecord) -> Result<()> {
        record.ensure_lintable()?;
        self.tx.send(record).await.map_err(|_| LintError::Closed)
    }

    /// Signal end of input.
    pub fn end(self) {
        drop(self);
    }
}

/// Create a bounded channel feeding records into a pipeline.
pub fn record_channel(capacity: usize) -> (RecordSender, BoxStream<'static, FileRecord>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let records = stream::unfold(rx, |mut rx| async move {
        let record = rx.recv().await?;
        Some((record, rx))
    })
    .boxed();
    (RecordSender { tx }, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_relative_path_strips_base() {
        let record = FileRecord::buffer("/src/styles/a.less", "x").with_base("/src");
        assert_eq!(record.relative(), Path::new("styles/a.less"));

        let unrelated = FileRecord::buffer("/other/a.less", "x").with_base("/src");
        assert_eq!(unrelated.relative(), Path::new("/other/a.less"));
    }

    #[test]
    fn test_streaming_content_is_not_lintable() {
        let record = FileRecord::streaming("a.less", tokio::io::empty());
        let err = record.ensure_lintable().expect_err("streaming must be rejected");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(record.text().is_none());
    }

    #[test]
    fn test_linted_record_is_not_lintable_again() {
        let mut record = FileRecord::buffer("a.less", ".a {}");
        record.attach(LintResult::new("a.less", vec![]));
        assert!(record.ensure_lintable().is_err());
        assert!(record.lint_result().is_some());
    }

    #[test]
    fn test_null_record_has_no_text() {
        let record = FileRecord::null("dir");
        assert!(record.is_null());
        assert!(record.text().is_none());
        assert!(record.ensure_lintable().is_ok());
    }

    #[tokio::test]
    async fn test_channel_rejects_streaming_synchronously() {
        let (sender, mut records) = record_channel(2);
        let err = sender
            .write(FileRecord::streaming("a.less", tokio::io::empty()))
            .await
            .expect_err("streaming write must fail");
        assert_eq!(err.kind(), ErrorKind::Configuration);

        sender.write(FileRecord::null("dir")).await.expect("write null");
        sender.end();
        let first = records.next().await.expect("one record");
        assert!(first.is_null());
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_write_after_consumer_dropped_is_closed() {
        let (sender, records) = record_channel(1);
        drop(records);
        let err = sender.write(FileRecord::null("dir")).await.expect_err("closed");
        assert_eq!(err, LintError::Closed);
    }
}
