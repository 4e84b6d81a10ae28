//! Upstream HTTP client
//!
//! This module provides the async GET client used to reach the upstream
//! generation API. The body is accumulated chunk by chunk and returned as
//! text; HTTP status codes are not interpreted.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// Error types that can occur while talking to the upstream API
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid upstream URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Outbound side of the proxy
#[async_trait]
pub trait Upstream: Send + Sync {
    /// GET `url` with `params` appended as a form-encoded query string and
    /// return the full response body
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String, UpstreamError>;
}

/// Append form-encoded query parameters to a URL, keeping their order
pub fn build_url(url: &str, params: &[(&str, &str)]) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(url).map_err(|e| UpstreamError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().extend_pairs(params.iter().copied());
    Ok(url)
}

/// reqwest-backed upstream client
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `timeout` - Whole-request timeout, `None` to wait indefinitely
    pub fn new(timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(UpstreamError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String, UpstreamError> {
        let url = build_url(url, params)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            body.extend_from_slice(&chunk?);
        }

        debug!("Upstream answered {} with {} bytes", status, body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
