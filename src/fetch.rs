//! HTTP fetch collaborator
//!
//! The pipeline only ever sees a typed [`FetchResponse`] or a typed
//! [`FetchError`]; transport-level failures never surface through a side
//! channel. [`HttpFetcher`] is the production implementation; tests
//! substitute their own [`PageFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::FetchConfig;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result of a completed fetch
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: String,
}

impl FetchResponse {
    /// Whether the status code indicates an error response
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable status line, e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        match reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

/// Collaborator that retrieves a URL's content
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Production fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
