//! lesshint-stream CLI
//!
//! Lints Less files through the streaming pipeline: records are read from
//! disk, linted, reported on stdout, and optionally gated by the severity
//! thresholds and a warning budget.
//!
//! Exit status is non-zero when the pipeline ends with a fatal error.

mod sources;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::{Stream, StreamExt};
use lesshint_rules::RuleEngine;
use lesshint_stream::{
    record_channel, FileRecord, FsConfigResolver, LintError, LintOptions, LintStage,
    RecordStream, RecordStreamExt, ReportFormat, DEFAULT_CONCURRENCY,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "lesshint-stream")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint Less files through a streaming pipeline", long_about = None)]
struct Cli {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Configuration file (default: nearest .lesshintrc above each file)
    #[arg(short, long, env = "LESSHINT_CONFIG")]
    config: Option<PathBuf>,

    /// Fail when the run produces more warnings than this
    #[arg(long)]
    max_warnings: Option<usize>,

    /// Fail on the first file with an error
    #[arg(long)]
    fail_on_error: bool,

    /// Fail on the first file with a warning
    #[arg(long)]
    fail_on_warning: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Human)]
    format: Format,

    /// Files linted concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Human,
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => ReportFormat::Human,
            Format::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(cli.json_logs, level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LintError>() {
                Some(lint_err) => eprintln!("{}: {}", lint_err.name(), lint_err),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn options(cli: &Cli) -> LintOptions {
    let mut options = LintOptions::new().with_concurrency(cli.concurrency);
    if let Some(path) = &cli.config {
        options = options.with_config_path(path);
    }
    if let Some(max) = cli.max_warnings {
        options = options.with_max_warnings(max);
    }
    options
}

/// Lint, report, then apply the gates. The warning budget sits after the
/// reporter so an exceeded budget still prints the totals.
fn pipeline<S, W>(records: S, cli: &Cli, writer: W) -> RecordStream
where
    S: Stream<Item = FileRecord> + Send + 'static,
    W: Write + Send + 'static,
{
    let mut stream = LintStage::new(
        Arc::new(RuleEngine::new()),
        Arc::new(FsConfigResolver::new()),
    )
    .with_options(options(cli))
    .run(records)
    .report(writer, cli.format.into());
    if cli.fail_on_error {
        stream = stream.fail_on_error();
    }
    if cli.fail_on_warning {
        stream = stream.fail_on_warning();
    }
    if let Some(max) = cli.max_warnings {
        stream = stream.max_warnings(max);
    }
    stream
}

async fn run(cli: Cli) -> Result<()> {
    let (tx, records) = record_channel(options(&cli).effective_concurrency() * 2);
    let producer = tokio::spawn(sources::feed(cli.paths.clone(), tx));
    let mut stream = pipeline(records, &cli, std::io::stdout());

    let mut forwarded = 0usize;
    while let Some(item) = stream.next().await {
        item?;
        forwarded += 1;
    }

    let written = producer.await.context("Record producer task failed")??;
    info!(written, forwarded, "Lint run complete");
    Ok(())
}
