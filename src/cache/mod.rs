//! Local file cache in front of the remote catalog.
//!
//! Every remote resource maps to one local path. A read either comes
//! straight from that path or, on a miss, from the [`Origin`], after which
//! the bytes are persisted at the path for every later run.
//!
//! # Policy
//!
//! - Existing files are trusted as-is unless a [`CachePolicy::MaxAge`] is
//!   configured; freshness is never checked against the origin.
//! - Only "file not found" triggers a download. Any other read error is
//!   returned unchanged.
//! - Offline, a miss is [`MirrorError::Offline`] and nothing is written.

pub mod origin;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::fs;
use tracing::{debug, info};

use crate::config::{CachePolicy, MirrorConfig};
use crate::domain::RemoteUrl;
use crate::error::{MirrorError, Result};

pub use origin::{HttpOrigin, Origin};

/// The cached-fetch primitive
#[derive(Clone)]
pub struct Cache {
    origin: Arc<dyn Origin>,
    offline: bool,
    policy: CachePolicy,
}

impl Cache {
    pub fn new(origin: Arc<dyn Origin>, offline: bool, policy: CachePolicy) -> Self {
        Self {
            origin,
            offline,
            policy,
        }
    }

    /// Build a cache from the run configuration
    pub fn from_config(config: &MirrorConfig, origin: Arc<dyn Origin>) -> Self {
        Self::new(origin, config.offline, config.cache_policy)
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Return the bytes at `path`, downloading them from `url` first if the
    /// file does not exist yet.
    pub async fn fetch(&self, path: &Path, url: &RemoteUrl) -> Result<Vec<u8>> {
        match fs::read(path).await {
            Ok(content) => {
                if self.offline || self.is_fresh(path).await? {
                    debug!(path = %path.display(), "Cache hit");
                    return Ok(content);
                }
                info!(path = %path.display(), "Cached copy expired, downloading");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.offline {
                    return Err(MirrorError::Offline {
                        path: path.to_path_buf(),
                    });
                }
                info!(path = %path.display(), "Not available offline, downloading");
            }
            Err(source) => {
                return Err(MirrorError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        if url.is_empty() {
            return Err(MirrorError::InvalidUrl {
                url: String::new(),
                reason: format!("no origin for {}", path.display()),
            });
        }

        let content = self.origin.get(url).await?;
        write_atomic(path, &content).await?;
        info!(path = %path.display(), bytes = content.len(), "Synced and saved");

        Ok(content)
    }

    async fn is_fresh(&self, path: &Path) -> Result<bool> {
        let max_age = match self.policy {
            CachePolicy::TrustForever => return Ok(true),
            CachePolicy::MaxAge(max_age) => max_age,
        };

        let read_err = |source: std::io::Error| MirrorError::Read {
            path: path.to_path_buf(),
            source,
        };
        let modified = fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .map_err(read_err)?;

        // Clock skew (mtime in the future) counts as fresh
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();

        Ok(age <= max_age)
    }
}

/// Write `content` next to `path` and rename it into place, so a crash
/// mid-write never leaves a truncated cache entry behind.
async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let part = part_path(path);
    let fs_err = |source: std::io::Error| MirrorError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = fs::write(&part, content).await {
        let _ = fs::remove_file(&part).await;
        return Err(fs_err(e));
    }

    if let Err(e) = fs::rename(&part, path).await {
        let _ = fs::remove_file(&part).await;
        return Err(fs_err(e));
    }

    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.part", name))
}
