//! Lint stage: runs the engine over each record and attaches the result.
//!
//! Engine calls for up to `concurrency` records overlap, but results leave
//! the stage in input order. A rejected record stops intake and fails the
//! stream after the records admitted before it. Any other failure ends the
//! stream and drops whatever was still in flight.

use crate::config::{ConfigResolver, Configuration};
use crate::engine::LintEngine;
use crate::error::{LintError, Result};
use crate::obs;
use crate::options::LintOptions;
use crate::record::FileRecord;
use crate::result::LintResult;
use crate::stage::{RecordStream, RecordStreamExt};
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, FuturesOrdered, Stream, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::info;

type InFlight = BoxFuture<'static, Result<FileRecord>>;

/// Lint stage configuration and collaborators.
#[derive(Clone)]
pub struct LintStage {
    engine: Arc<dyn LintEngine>,
    resolver: Arc<dyn ConfigResolver>,
    options: LintOptions,
}

impl LintStage {
    pub fn new(engine: Arc<dyn LintEngine>, resolver: Arc<dyn ConfigResolver>) -> Self {
        Self {
            engine,
            resolver,
            options: LintOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LintOptions) -> Self {
        self.options = options;
        self
    }

    /// Start linting `input`.
    pub fn run<S>(self, input: S) -> LintStream
    where
        S: Stream<Item = FileRecord> + Send + 'static,
    {
        let startup = self.options.config_path.clone().map(|path| {
            let resolver = Arc::clone(&self.resolver);
            async move { resolver.resolve(Some(path.as_path()), Path::new(".")).await }.boxed()
        });
        info!(
            config = ?self.options.config_path,
            concurrency = self.options.effective_concurrency(),
            "Starting lint stage"
        );
        LintStream {
            limit: self.options.effective_concurrency(),
            stage: self,
            input: input.boxed(),
            startup,
            shared: None,
            in_flight: FuturesOrdered::new(),
            input_done: false,
            terminated: false,
            forwarded: 0,
        }
    }
}

/// Lint `input`, enforcing `max_warnings` when the options set it.
pub fn lint<S>(
    input: S,
    options: LintOptions,
    engine: Arc<dyn LintEngine>,
    resolver: Arc<dyn ConfigResolver>,
) -> RecordStream
where
    S: Stream<Item = FileRecord> + Send + 'static,
{
    let max_warnings = options.max_warnings;
    let stream = LintStage::new(engine, resolver).with_options(options).run(input);
    match max_warnings {
        Some(max) => stream.max_warnings(max),
        None => stream.boxed(),
    }
}

/// Output stream of the lint stage.
pub struct LintStream {
    stage: LintStage,
    input: BoxStream<'static, FileRecord>,
    startup: Option<BoxFuture<'static, Result<Arc<Configuration>>>>,
    shared: Option<Arc<Configuration>>,
    in_flight: FuturesOrdered<InFlight>,
    limit: usize,
    input_done: bool,
    terminated: bool,
    forwarded: u64,
}

impl LintStream {
    /// Validate a record and build the work that forwards it.
    fn admit(&self, record: FileRecord) -> Result<InFlight> {
        record.ensure_lintable()?;
        if record.is_null() {
            obs::emit_record_skipped(&record.display_path(), "null_content");
            return Ok(future::ready(Ok(record)).boxed());
        }

        let engine = Arc::clone(&self.stage.engine);
        let resolver = Arc::clone(&self.stage.resolver);
        let shared = self.shared.clone();
        Ok(async move {
            let config = match shared {
                Some(config) => config,
                None => resolver.resolve(None, record.path()).await?,
            };
            if config.is_excluded(record.path(), record.base()) {
                obs::emit_record_skipped(&record.display_path(), "excluded");
                return Ok(record);
            }
            lint_record(record, engine, config).await
        }
        .boxed())
    }

    fn fail(&mut self, err: LintError) -> Poll<Option<Result<FileRecord>>> {
        self.terminated = true;
        self.in_flight = FuturesOrdered::new();
        self.input = stream::empty().boxed();
        obs::emit_stage_failed("lint", &err);
        Poll::Ready(Some(Err(err)))
    }
}

async fn lint_record(
    mut record: FileRecord,
    engine: Arc<dyn LintEngine>,
    config: Arc<Configuration>,
) -> Result<FileRecord> {
    let path = record.display_path();
    let Some(source) = record.text() else {
        return Ok(record);
    };
    let messages = engine
        .check(&source, &config)
        .await
        .map_err(|e| LintError::engine(path.clone(), e.message))?;

    let result = LintResult::new(path, messages);
    obs::emit_record_linted(result.file_path(), result.error_count(), result.warning_count());
    record.attach(result);
    Ok(record)
}

impl Stream for LintStream {
    type Item = Result<FileRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }

        if let Some(startup) = this.startup.as_mut() {
            match startup.poll_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(config)) => {
                    this.startup = None;
                    this.shared = Some(config);
                }
                Poll::Ready(Err(err)) => {
                    this.startup = None;
                    return this.fail(err);
                }
            }
        }

        while !this.input_done && this.in_flight.len() < this.limit {
            match this.input.poll_next_unpin(cx) {
                Poll::Ready(Some(record)) => match this.admit(record) {
                    Ok(work) => this.in_flight.push_back(work),
                    Err(err) => {
                        // Queued behind earlier records so they still drain.
                        this.in_flight.push_back(future::ready(Err(err)).boxed());
                        this.input_done = true;
                        this.input = stream::empty().boxed();
                    }
                },
                Poll::Ready(None) => this.input_done = true,
                Poll::Pending => break,
            }
        }

        match this.in_flight.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(record))) => {
                this.forwarded += 1;
                Poll::Ready(Some(Ok(record)))
            }
            Poll::Ready(Some(Err(err))) => this.fail(err),
            Poll::Ready(None) if this.input_done => {
                this.terminated = true;
                obs::emit_stage_finished("lint", this.forwarded);
                Poll::Ready(None)
            }
            Poll::Ready(None) | Poll::Pending => Poll::Pending,
        }
    }
}
