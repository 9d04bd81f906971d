//! Configuration for a mirror run.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags
//! 2. Config file (`--config <path>`, YAML)
//! 3. Defaults
//!
//! The resolved [`MirrorConfig`] is immutable and passed by value into the
//! cache, the catalog client and the orchestrator. Nothing reads it from a
//! global.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::RemoteUrl;

/// Root listing endpoint of the public catalog
pub const DEFAULT_LISTING_URL: &str = "https://wolnelektury.pl/api/books/";

/// Cached listing file, relative to the mirror root
pub const DEFAULT_LISTING_FILE: &str = "books.json";

/// Cached detail record, relative to a work directory
pub const DEFAULT_DETAIL_FILE: &str = "details.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Mirror root (relative to the config file's directory)
    pub root: Option<String>,
    pub listing_url: Option<String>,
    #[serde(default)]
    pub offline: Option<bool>,
    #[serde(default)]
    pub cache: Option<CacheSection>,
    #[serde(default)]
    pub http: Option<HttpSection>,
    #[serde(default)]
    pub keep_going: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSection {
    /// Re-download cached files older than this many days
    pub max_age_days: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpSection {
    pub max_idle_per_host: Option<usize>,
    pub idle_timeout_seconds: Option<u64>,
}

/// When a cached file is considered good enough to serve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Any existing file is served; nothing is ever re-downloaded
    #[default]
    TrustForever,

    /// Files older than the limit are re-downloaded when online
    MaxAge(Duration),
}

/// What the driver does when a single work fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole run on the first error
    #[default]
    Abort,

    /// Record the failure and continue with the next work
    KeepGoing,
}

/// HTTP connection pool settings
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Directory all cache paths are resolved against
    pub root: PathBuf,
    pub listing_url: RemoteUrl,
    pub listing_file: String,
    pub detail_file: String,
    /// Serve only from cache; any miss is an error
    pub offline: bool,
    pub cache_policy: CachePolicy,
    pub failure_policy: FailurePolicy,
    pub http: HttpSettings,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            listing_url: default_listing_url(),
            listing_file: DEFAULT_LISTING_FILE.to_string(),
            detail_file: DEFAULT_DETAIL_FILE.to_string(),
            offline: false,
            cache_policy: CachePolicy::default(),
            failure_policy: FailurePolicy::default(),
            http: HttpSettings::default(),
        }
    }
}

fn default_listing_url() -> RemoteUrl {
    DEFAULT_LISTING_URL
        .parse()
        .unwrap_or_else(|_| RemoteUrl::empty())
}

impl MirrorConfig {
    /// Config rooted at `root` with all other settings at their defaults
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_listing_url(mut self, url: RemoteUrl) -> Self {
        self.listing_url = url;
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Path of the cached root listing
    pub fn listing_path(&self) -> PathBuf {
        self.root.join(&self.listing_file)
    }

    /// Directory holding everything cached for one work
    pub fn work_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug)
    }

    /// Path of the cached detail record for one work
    pub fn detail_path(&self, slug: &str) -> PathBuf {
        self.work_dir(slug).join(&self.detail_file)
    }

    /// Overlay values from a config file. `base` is the directory relative
    /// paths in the file are resolved against.
    pub fn apply_file(mut self, file: ConfigFile, base: &Path) -> Result<Self> {
        if let Some(root) = file.root {
            self.root = resolve_path(base, &root);
        }
        if let Some(url) = file.listing_url {
            self.listing_url = url
                .parse()
                .with_context(|| format!("Invalid listing_url in config: {}", url))?;
        }
        if let Some(offline) = file.offline {
            self.offline = offline;
        }
        if let Some(days) = file.cache.and_then(|c| c.max_age_days) {
            self = self.with_cache_policy(CachePolicy::MaxAge(days_to_duration(days)));
        }
        if let Some(http) = file.http {
            if let Some(n) = http.max_idle_per_host {
                self.http.max_idle_per_host = n;
            }
            if let Some(secs) = http.idle_timeout_seconds {
                self.http.idle_timeout = Duration::from_secs(secs);
            }
        }
        if file.keep_going == Some(true) {
            self.failure_policy = FailurePolicy::KeepGoing;
        }
        Ok(self)
    }
}

/// Convert a day count to a duration, saturating instead of overflowing
pub fn days_to_duration(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(24 * 60 * 60))
}

/// Load and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
