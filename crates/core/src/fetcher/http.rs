//! reqwest-backed fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{FetchError, Fetcher};
use crate::config::SourceConfig;

/// Fetches pages over HTTP(S), following redirects.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher. Fails only if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "Requesting status page");

        let response = self.client.get(url).send().await?;

        // Error pages are passed through; the extractor finds no rows in them.
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Status page returned HTTP {}", status);
        }

        let body = response.text().await?;
        Ok(body)
    }
}
