//! Client for the remote catalog, served through the local cache.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/
//! ├── books.json                # Root listing
//! └── <slug>/
//!     ├── details.json          # Detail record, verbatim from the API
//!     ├── <slug>.txt            # One file per available format
//!     └── <slug>.epub
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::Cache;
use crate::config::MirrorConfig;
use crate::domain::{WorkDetail, WorkSummary};
use crate::error::{MirrorError, Result};

/// Lists works and loads their detail records
#[derive(Clone)]
pub struct CatalogClient {
    cache: Cache,
    config: MirrorConfig,
}

impl CatalogClient {
    pub fn new(config: &MirrorConfig, cache: Cache) -> Self {
        Self {
            cache,
            config: config.clone(),
        }
    }

    /// The underlying cache
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Mirror root directory
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Local directory for a work
    pub fn work_dir(&self, slug: &str) -> PathBuf {
        self.config.work_dir(slug)
    }

    /// All works in the catalog, in listing order
    pub async fn list_works(&self) -> Result<Vec<WorkSummary>> {
        let path = self.config.listing_path();
        let content = self.cache.fetch(&path, &self.config.listing_url).await?;

        let works: Vec<WorkSummary> = decode(&content, &self.config.listing_file)?;
        debug!(count = works.len(), "Loaded catalog listing");
        Ok(works)
    }

    /// Detail record for one work, with its slug stamped in
    pub async fn fetch_detail(&self, summary: &WorkSummary) -> Result<WorkDetail> {
        let path = self.config.detail_path(&summary.slug);
        let content = self.cache.fetch(&path, &summary.detail_url).await?;

        let mut detail: WorkDetail =
            decode(&content, &format!("{}/{}", summary.slug, self.config.detail_file))?;
        detail.slug = summary.slug.clone();
        Ok(detail)
    }
}

fn decode<T: DeserializeOwned>(content: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(content).map_err(|source| MirrorError::Decode {
        what: what.to_string(),
        source,
    })
}
