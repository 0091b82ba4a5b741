//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, Fetcher};

/// Mock implementation of the Fetcher trait.
///
/// Returns a configurable body, records requested URLs and can be told to
/// fail the next request.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Body returned by every successful fetch.
    body: Arc<RwLock<String>>,
    /// Recorded request URLs.
    requests: Arc<RwLock<Vec<String>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
}

impl std::fmt::Debug for MockFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFetcher")
            .field("body", &"<body>")
            .field("requests", &"<requests>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher returning an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock fetcher returning `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Arc::new(RwLock::new(body.into())),
            ..Self::default()
        }
    }

    /// Replace the body returned by later fetches.
    pub async fn set_body(&self, body: impl Into<String>) {
        *self.body.write().await = body.into();
    }

    /// Make the next fetch fail with `error`.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// URLs requested so far.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.write().await.push(url.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.body.read().await.clone())
    }
}
