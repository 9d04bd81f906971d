//! Where cache misses are fetched from.

use async_trait::async_trait;
use tracing::debug;

use crate::config::HttpSettings;
use crate::domain::RemoteUrl;
use crate::error::{MirrorError, Result};

/// Source of remote bytes for cache misses
#[async_trait]
pub trait Origin: Send + Sync {
    /// GET the resource and return its full body
    async fn get(&self, url: &RemoteUrl) -> Result<Vec<u8>>;
}

/// HTTP origin backed by one pooled client for the whole run
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    /// Create an origin with the given pool settings
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(settings.max_idle_per_host)
            .pool_idle_timeout(settings.idle_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(MirrorError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn get(&self, url: &RemoteUrl) -> Result<Vec<u8>> {
        let target = url.as_url().ok_or_else(|| MirrorError::InvalidUrl {
            url: String::new(),
            reason: "empty URL".to_string(),
        })?;

        let network = |source: reqwest::Error| MirrorError::Network {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        debug!(%url, bytes = body.len(), "Fetched from origin");

        Ok(body.to_vec())
    }
}
