//! Turns catalog entries into populated local directories.
//!
//! Works are processed one at a time, in listing order. Within a work the
//! steps are: create the directory, load the detail record, resolve the
//! available formats, fetch each format file.

use std::io::ErrorKind;
use std::path::{Component, Path};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::{Cache, HttpOrigin, Origin};
use crate::catalog::CatalogClient;
use crate::config::{FailurePolicy, MirrorConfig};
use crate::domain::{WorkDetail, WorkSummary};
use crate::error::{MirrorError, Result};

use super::state::{MirrorReport, WorkFailure, WorkState};

/// Main mirror orchestrator
pub struct Orchestrator {
    catalog: CatalogClient,
    failure_policy: FailurePolicy,
}

impl Orchestrator {
    /// Create an orchestrator talking to the real catalog over HTTP
    pub fn new(config: &MirrorConfig) -> Result<Self> {
        let origin = Arc::new(HttpOrigin::new(&config.http)?);
        Ok(Self::with_origin(config, origin))
    }

    /// Create an orchestrator with a custom origin
    pub fn with_origin(config: &MirrorConfig, origin: Arc<dyn Origin>) -> Self {
        let cache = Cache::from_config(config, origin);
        Self {
            catalog: CatalogClient::new(config, cache),
            failure_policy: config.failure_policy,
        }
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Mirror the whole catalog
    #[instrument(skip(self))]
    pub async fn mirror_all(&self) -> Result<MirrorReport> {
        // Offline runs must not write anything, not even the root
        if !self.catalog.cache().is_offline() {
            ensure_root(self.catalog.root()).await?;
        }

        let works = self.catalog.list_works().await?;
        let total = works.len();
        info!(total, "Mirroring catalog");

        let mut report = MirrorReport::new(total);
        for (idx, summary) in works.iter().enumerate() {
            match self.obtain_work(summary).await {
                Ok(detail) => {
                    info!(slug = %summary.slug, "[{}/{}] {}", idx + 1, total, detail.title);
                    report.record_done(detail.available_formats().count());
                }
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => {
                        error!(slug = %summary.slug, error = %e, "Aborting mirror run");
                        return Err(e);
                    }
                    FailurePolicy::KeepGoing => {
                        warn!(slug = %summary.slug, error = %e, "[{}/{}] Skipping work", idx + 1, total);
                        report.record_failure(WorkFailure {
                            slug: summary.slug.clone(),
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            done = report.done,
            failed = report.failures.len(),
            files = report.files,
            "Mirror run finished"
        );
        Ok(report)
    }

    /// Populate the local directory for one work.
    ///
    /// Any error aborts the work immediately; files fetched before the error
    /// stay cached.
    #[instrument(skip(self, summary), fields(slug = %summary.slug))]
    pub async fn obtain_work(&self, summary: &WorkSummary) -> Result<WorkDetail> {
        let mut state = WorkState::Pending;
        let result = self.obtain_work_inner(summary, &mut state).await;

        if let Err(e) = &result {
            debug!(from = %state, error = %e, "Work aborted");
            state = WorkState::Aborted;
        }
        debug!(state = %state, "Work finished");

        result
    }

    async fn obtain_work_inner(
        &self,
        summary: &WorkSummary,
        state: &mut WorkState,
    ) -> Result<WorkDetail> {
        check_slug(&summary.slug)?;

        let dir = self.catalog.work_dir(&summary.slug);
        ensure_dir(&dir).await?;
        state.advance(WorkState::DirReady);

        let detail = self.catalog.fetch_detail(summary).await?;
        state.advance(WorkState::DetailLoaded);

        let files = detail.files();
        let total = files.len();
        for (idx, (file_name, url)) in files.iter().enumerate() {
            state.advance(WorkState::Fetching {
                current: idx + 1,
                total,
            });
            self.catalog
                .cache()
                .fetch(&dir.join(file_name), url)
                .await?;
        }

        state.advance(WorkState::Done);
        Ok(detail)
    }
}

/// Create the mirror root and any missing parents
async fn ensure_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root)
        .await
        .map_err(|source| MirrorError::Filesystem {
            path: root.to_path_buf(),
            source,
        })
}

/// Create the work directory; an existing directory is fine
async fn ensure_dir(dir: &Path) -> Result<()> {
    let fs_err = |source: std::io::Error| MirrorError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };

    match fs::create_dir(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let meta = fs::metadata(dir).await.map_err(fs_err)?;
            if meta.is_dir() {
                Ok(())
            } else {
                Err(fs_err(std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    "exists and is not a directory",
                )))
            }
        }
        Err(source) => Err(fs_err(source)),
    }
}

/// Slugs become directory names, so they must be a single normal component
fn check_slug(slug: &str) -> Result<()> {
    let mut components = Path::new(slug).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !slug.contains(['/', '\\']) => Ok(()),
        _ => Err(MirrorError::InvalidSlug(slug.to_string())),
    }
}
