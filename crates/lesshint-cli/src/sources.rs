//! Turns command-line paths into file records.

use anyhow::{Context, Result};
use lesshint_stream::{FileRecord, LintError, RecordSender};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const LESS_EXTENSION: &str = "less";

/// A path to feed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    /// Root the path was found under, for display.
    pub base: PathBuf,
    pub is_dir: bool,
}

/// Expand `roots` into entries, in walk order.
///
/// Directories are walked recursively and contribute themselves plus every
/// `.less` file below them. A file named directly is taken as-is.
pub fn walk(roots: &[PathBuf]) -> Result<Vec<Entry>> {
    let mut out = Vec::new();
    for root in roots {
        if root.is_file() {
            out.push(Entry {
                path: root.clone(),
                base: root.parent().map(Path::to_path_buf).unwrap_or_default(),
                is_dir: false,
            });
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            let is_dir = entry.file_type().is_dir();
            if is_dir || is_less(entry.path()) {
                out.push(Entry {
                    path: entry.path().to_path_buf(),
                    base: root.clone(),
                    is_dir,
                });
            }
        }
    }
    Ok(out)
}

fn is_less(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LESS_EXTENSION)
}

/// Read every entry under `roots` and write it into the pipeline.
///
/// Stops quietly when the pipeline has already terminated.
pub async fn feed(roots: Vec<PathBuf>, tx: RecordSender) -> Result<usize> {
    let entries = tokio::task::spawn_blocking(move || walk(&roots))
        .await
        .context("Path walk task failed")??;

    let mut written = 0;
    for entry in entries {
        let record = if entry.is_dir {
            FileRecord::null(&entry.path)
        } else {
            let bytes = tokio::fs::read(&entry.path)
                .await
                .with_context(|| format!("Failed to read {}", entry.path.display()))?;
            FileRecord::buffer(&entry.path, bytes)
        }
        .with_base(&entry.base);

        match tx.write(record).await {
            Ok(()) => written += 1,
            Err(LintError::Closed) => {
                debug!(written, "Pipeline stopped accepting records");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    tx.end();
    Ok(written)
}
