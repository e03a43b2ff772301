//! Lint configuration, exclusion patterns, and configuration resolution.
//!
//! A configuration file is a JSON object. `excludedFiles` holds glob
//! patterns; every other key is rule settings, opaque to the pipeline and
//! interpreted by the lint engine.

use crate::error::{LintError, Result};
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// File name looked up when no explicit config path is given.
pub const CONVENTIONAL_CONFIG_FILE: &str = ".lesshintrc";

const EXCLUDED_FILES_KEY: &str = "excludedFiles";

/// Compiled set of path patterns whose records skip linting.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExclusionSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                LintError::configuration(format!("Invalid exclusion pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| LintError::configuration(format!("Invalid exclusion patterns: {}", e)))?;
        Ok(Self { patterns, set })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Match against the full path, the base-relative path, and the file name.
    pub fn matches(&self, path: &Path, base: Option<&Path>) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.set.is_match(path) {
            return true;
        }
        if let Some(relative) = base.and_then(|b| path.strip_prefix(b).ok()) {
            if self.set.is_match(relative) {
                return true;
            }
        }
        path.file_name()
            .map(|name| self.set.is_match(Path::new(name)))
            .unwrap_or(false)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Effective configuration for linting one or more records.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    rules: Map<String, Value>,
    exclusions: ExclusionSet,
    source: Option<PathBuf>,
}

impl Configuration {
    pub fn new(rules: Map<String, Value>, exclusions: ExclusionSet) -> Self {
        Self {
            rules,
            exclusions,
            source: None,
        }
    }

    /// Parse a configuration document.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut rules) = value else {
            return Err(LintError::configuration(
                "Configuration must be a JSON object",
            ));
        };
        let exclusions = match rules.remove(EXCLUDED_FILES_KEY) {
            None | Some(Value::Null) => ExclusionSet::empty(),
            Some(Value::Array(items)) => {
                let mut patterns = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => patterns.push(s),
                        other => {
                            return Err(LintError::configuration(format!(
                                "{} entries must be strings, got {}",
                                EXCLUDED_FILES_KEY, other
                            )))
                        }
                    }
                }
                ExclusionSet::new(patterns)?
            }
            Some(other) => {
                return Err(LintError::configuration(format!(
                    "{} must be an array, got {}",
                    EXCLUDED_FILES_KEY, other
                )))
            }
        };
        Ok(Self::new(rules, exclusions))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            LintError::configuration(format!("Configuration is not valid JSON: {}", e))
        })?;
        Self::from_json(value)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// File the configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rule settings keyed by rule identifier.
    pub fn rules(&self) -> &Map<String, Value> {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Value> {
        self.rules.get(name)
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn is_excluded(&self, path: &Path, base: Option<&Path>) -> bool {
        self.exclusions.matches(path, base)
    }
}

/// Resolves the effective configuration for a file.
#[async_trait]
pub trait ConfigResolver: Send + Sync {
    /// Look up `config_path` when given, else a conventional location
    /// relative to `file_context`.
    async fn resolve(
        &self,
        config_path: Option<&Path>,
        file_context: &Path,
    ) -> Result<Arc<Configuration>>;
}

/// Resolver backed by the filesystem, caching parsed files by path.
#[derive(Debug, Default)]
pub struct FsConfigResolver {
    cache: Mutex<HashMap<PathBuf, Arc<Configuration>>>,
    default: Arc<Configuration>,
}

impl FsConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the nearest conventional config file at or above `start`.
    pub async fn discover(start: &Path) -> Option<PathBuf> {
        let is_dir = tokio::fs::metadata(start)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let mut dir = if is_dir { Some(start) } else { start.parent() };
        while let Some(current) = dir {
            let candidate = current.join(CONVENTIONAL_CONFIG_FILE);
            if tokio::fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Some(candidate);
            }
            dir = current.parent();
        }
        None
    }

    async fn load(&self, path: &Path) -> Result<Arc<Configuration>> {
        if let Some(cached) = self.cached(path) {
            return Ok(cached);
        }
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            LintError::configuration(format!(
                "Failed to read configuration '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Configuration::parse(&text)
            .map_err(|e| {
                LintError::configuration(format!(
                    "Invalid configuration '{}': {}",
                    path.display(),
                    e
                ))
            })?
            .with_source(path);
        debug!(config = %path.display(), "Loaded lint configuration");

        let config = Arc::new(config);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(path.to_path_buf(), Arc::clone(&config));
        }
        Ok(config)
    }

    fn cached(&self, path: &Path) -> Option<Arc<Configuration>> {
        self.cache.lock().ok()?.get(path).cloned()
    }
}

#[async_trait]
impl ConfigResolver for FsConfigResolver {
    async fn resolve(
        &self,
        config_path: Option<&Path>,
        file_context: &Path,
    ) -> Result<Arc<Configuration>> {
        if let Some(explicit) = config_path {
            return self.load(explicit).await;
        }
        match Self::discover(file_context).await {
            Some(found) => self.load(&found).await,
            None => Ok(Arc::clone(&self.default)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_exclusions_match_file_name_and_full_path() {
        let set = ExclusionSet::new(["exclude.less", "**/vendor/**"]).expect("valid globs");
        assert!(set.matches(Path::new("/proj/test/exclude.less"), None));
        assert!(set.matches(Path::new("/proj/vendor/lib.less"), None));
        assert!(!set.matches(Path::new("/proj/test/fixture.less"), None));
    }

    #[test]
    fn test_exclusions_match_base_relative_path() {
        let set = ExclusionSet::new(["legacy/*.less"]).expect("valid glob");
        let path = Path::new("/proj/styles/legacy/old.less");
        assert!(set.matches(path, Some(Path::new("/proj/styles"))));
        assert!(!set.matches(path, Some(Path::new("/elsewhere"))));
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = ExclusionSet::new(["a[".to_string()]).expect_err("bad glob");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_json_splits_rules_and_exclusions() {
        let config = Configuration::from_json(json!({
            "excludedFiles": ["exclude.less"],
            "spaceAfterPropertyColon": { "severity": "error" },
            "importantRule": false
        }))
        .expect("parse");
        assert_eq!(config.exclusions().patterns(), ["exclude.less".to_string()]);
        assert!(config.rule("excludedFiles").is_none());
        assert_eq!(config.rule("importantRule"), Some(&json!(false)));
    }

    #[test]
    fn test_non_object_configuration_rejected() {
        let err = Configuration::from_json(json!([1, 2])).expect_err("array config");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(Configuration::from_json(json!({ "excludedFiles": "x" })).is_err());
        assert!(Configuration::parse("{ nope").is_err());
    }

    #[tokio::test]
    async fn test_fs_resolver_loads_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "excludedFiles": ["skip.less"] }"#).expect("write config");

        let resolver = FsConfigResolver::new();
        let config = resolver
            .resolve(Some(path.as_path()), Path::new("/anywhere/a.less"))
            .await
            .expect("resolve");
        assert_eq!(config.source(), Some(path.as_path()));
        assert!(config.is_excluded(Path::new("/x/skip.less"), None));
    }

    #[tokio::test]
    async fn test_fs_resolver_missing_explicit_path_fails() {
        let resolver = FsConfigResolver::new();
        let err = resolver
            .resolve(Some(Path::new("/definitely/not/here.json")), Path::new("a.less"))
            .await
            .expect_err("missing config");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_fs_resolver_discovers_conventional_file_upwards() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(
            dir.path().join(CONVENTIONAL_CONFIG_FILE),
            r#"{ "importantRule": false }"#,
        )
        .expect("write rc");

        let resolver = FsConfigResolver::new();
        let config = resolver
            .resolve(None, &nested.join("style.less"))
            .await
            .expect("resolve");
        assert_eq!(config.rule("importantRule"), Some(&Value::Bool(false)));
    }

    #[tokio::test]
    async fn test_fs_resolver_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolver = FsConfigResolver::new();
        let config = resolver
            .resolve(None, &dir.path().join("style.less"))
            .await
            .expect("resolve");
        assert!(config.source().is_none());
        assert!(config.rules().is_empty());
        assert!(config.exclusions().is_empty());
    }
}
