use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::RepositoryTransport;
use crate::errors::TransportError;
use crate::models::RepositoryResponse;

/// Default bound on a single repository attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed [`RepositoryTransport`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests are cut off after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Failed to build repository HTTP client ({}), requests fall back to an unbounded client",
                    e
                );
                Client::new()
            });

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl RepositoryTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RepositoryResponse, TransportError> {
        debug!("Event repository request: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RepositoryResponse { status, body })
    }
}
