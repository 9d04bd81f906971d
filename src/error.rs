//! Error type shared by the cache, catalog client and orchestrator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while mirroring the catalog
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Cache miss while running offline
    #[error("resource unavailable: offline flag specified ({})", path.display())]
    Offline { path: PathBuf },

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Directory creation or cache write failure
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local read failure other than "not found"
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Refusing unsafe slug: {0:?}")]
    InvalidSlug(String),
}

impl MirrorError {
    /// True if the error is the offline cache-miss condition
    pub fn is_offline(&self) -> bool {
        matches!(self, MirrorError::Offline { .. })
    }
}

pub type Result<T, E = MirrorError> = std::result::Result<T, E>;
