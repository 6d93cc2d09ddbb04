//! URL shortening
//!
//! Implementations are selected by configuration name through a static
//! registry; an unknown name is a startup error, not a per-message one.
//! A shortening failure drops the candidate before it reaches the cache.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::fetch::{FetchError, PageFetcher};

/// Errors from a shortening attempt
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("shortening service returned status {0}")]
    Status(u16),
    #[error("shortening service returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Unknown shortener name in the configuration
#[derive(Debug, Error)]
#[error("unknown shortener '{0}'")]
pub struct UnknownShortener(pub String);

/// Takes a canonical URL and returns a shortened form
#[async_trait]
pub trait UrlShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError>;
}

/// Passthrough shortener: returns the canonical URL unchanged
pub struct NoShortener;

#[async_trait]
impl UrlShortener for NoShortener {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError> {
        Ok(url.to_string())
    }
}

/// is.gd shortener
pub struct IsGdShortener {
    fetcher: Arc<dyn PageFetcher>,
}

impl IsGdShortener {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl UrlShortener for IsGdShortener {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError> {
        let encoded = utf8_percent_encode(url, NON_ALPHANUMERIC);
        let request = format!("https://is.gd/api.php?longurl={}", encoded);
        read_short_body(self.fetcher.fetch(&request).await?)
    }
}

/// tinyurl.com shortener
pub struct TinyUrlShortener {
    fetcher: Arc<dyn PageFetcher>,
}

impl TinyUrlShortener {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl UrlShortener for TinyUrlShortener {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError> {
        let encoded = utf8_percent_encode(url, NON_ALPHANUMERIC);
        let request = format!("https://tinyurl.com/api-create.php?url={}", encoded);
        read_short_body(self.fetcher.fetch(&request).await?)
    }
}

fn read_short_body(response: crate::fetch::FetchResponse) -> Result<String, ShortenError> {
    if response.is_error() {
        return Err(ShortenError::Status(response.status));
    }
    let short = response.body.trim();
    if short.is_empty() {
        return Err(ShortenError::EmptyResponse);
    }
    Ok(short.to_string())
}

/// Static registry mapping configuration names to constructors.
pub fn build_shortener(
    name: &str,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<Arc<dyn UrlShortener>, UnknownShortener> {
    match name {
        "none" => Ok(Arc::new(NoShortener)),
        "isgd" | "is.gd" => Ok(Arc::new(IsGdShortener::new(fetcher))),
        "tinyurl" => Ok(Arc::new(TinyUrlShortener::new(fetcher))),
        other => Err(UnknownShortener(other.to_string())),
    }
}
