//! In-memory doubles for the resolver and engine seams (testing only)
//!
//! `StaticResolver` hands out one fixed configuration (or one fixed failure);
//! `ScriptedEngine` answers from a table keyed by source text and records how
//! it was called.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{ConfigResolver, Configuration};
use crate::engine::{EngineError, LintEngine};
use crate::error::{LintError, Result};
use crate::result::Diagnostic;

// ---------------------------------------------------------------------------
// StaticResolver
// ---------------------------------------------------------------------------

/// Resolver returning the same configuration for every file.
#[derive(Debug, Default)]
pub struct StaticResolver {
    config: Arc<Configuration>,
    failure: Option<String>,
    requests: Mutex<Vec<(Option<PathBuf>, PathBuf)>>,
}

impl StaticResolver {
    pub fn new(config: Configuration) -> Self {
        Self {
            config: Arc::new(config),
            ..Self::default()
        }
    }

    /// Resolver whose every lookup fails with a configuration error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// `(config_path, file_context)` pairs seen so far.
    pub fn requests(&self) -> Vec<(Option<PathBuf>, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigResolver for StaticResolver {
    async fn resolve(
        &self,
        config_path: Option<&Path>,
        file_context: &Path,
    ) -> Result<Arc<Configuration>> {
        self.requests
            .lock()
            .unwrap()
            .push((config_path.map(Path::to_path_buf), file_context.to_path_buf()));
        match &self.failure {
            Some(message) => Err(LintError::configuration(message.clone())),
            None => Ok(Arc::clone(&self.config)),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedEngine
// ---------------------------------------------------------------------------

/// Engine answering from a script; unknown sources produce no diagnostics.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    responses: HashMap<String, Vec<Diagnostic>>,
    failures: Vec<(String, String)>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    sources: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `diagnostics` for exactly `source`.
    pub fn respond(mut self, source: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        self.responses.insert(source.into(), diagnostics);
        self
    }

    /// Fault with `message` for any source containing `needle`.
    pub fn fail_on(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.push((needle.into(), message.into()));
        self
    }

    /// Sleep for `delay` before answering `source`.
    pub fn delay(mut self, source: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(source.into(), delay);
        self
    }

    /// Number of `check` invocations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping `check` invocations observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Sources passed to `check`, in call order.
    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }
}

#[async_trait]
impl LintEngine for ScriptedEngine {
    async fn check(
        &self,
        source: &str,
        _config: &Configuration,
    ) -> std::result::Result<Vec<Diagnostic>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().push(source.to_string());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(source) {
            tokio::time::sleep(*delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if let Some((_, message)) = self
            .failures
            .iter()
            .find(|(needle, _)| source.contains(needle.as_str()))
        {
            return Err(EngineError::new(message.clone()));
        }
        Ok(self.responses.get(source).cloned().unwrap_or_default())
    }
}
