//! One-shot health check: GET, validate, return. No retries here.

use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;
use url::Url;

use crate::decode::decode_health;
use crate::error::FetchError;
use crate::types::HealthStatus;

#[derive(Debug, Clone)]
pub struct HealthFetcher {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HealthFetcher {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and validate the current health status.
    pub async fn fetch(&self) -> Result<HealthStatus, FetchError> {
        let resp = self
            .client
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let health = decode_health(&body)?;
        debug!(url = %self.endpoint, status = %health.status, "health fetched");
        Ok(health)
    }
}
