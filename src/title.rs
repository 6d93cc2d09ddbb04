//! Title resolution
//!
//! Fetches a URL and produces a display title: the document's
//! `<title>` text when the response is HTML, the content-type header for
//! non-document resources, and a synthesized status or placeholder
//! string otherwise. Fetch failures never escape; they resolve to an
//! error-signal title.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::fetch::{FetchError, FetchResponse, PageFetcher};
use crate::util::truncate_str;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static HTML_CONTENT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:text/x?html|application/xhtml\+xml)(?:\s*;.*)?$").unwrap()
});

/// Placeholder when error details are suppressed
const GENERIC_ERROR: &str = "Error";

/// Placeholder for documents without a title
const NO_TITLE: &str = "No Title";

/// Resolves a display title for a URL
pub struct TitleResolver {
    fetcher: Arc<dyn PageFetcher>,
    max_length: usize,
    show_errors: bool,
}

impl TitleResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_length: usize, show_errors: bool) -> Self {
        Self {
            fetcher,
            max_length,
            show_errors,
        }
    }

    /// Fetch `url` and produce a title, truncated to the configured
    /// maximum length. Always returns a string; one attempt, one
    /// outcome.
    pub async fn resolve(&self, url: &str) -> String {
        let title = match self.fetcher.fetch(url).await {
            Ok(response) => self.from_response(&response),
            Err(err) => {
                debug!(url, error = %err, "title fetch failed");
                if self.show_errors {
                    match err {
                        FetchError::Timeout(_) => "Request timed out".to_string(),
                        FetchError::Transport(_) => "Connection failed".to_string(),
                    }
                } else {
                    GENERIC_ERROR.to_string()
                }
            }
        };
        truncate_str(&title, self.max_length)
    }

    fn from_response(&self, response: &FetchResponse) -> String {
        // A non-HTML content type is itself the display title; it tells
        // the channel what kind of resource the link points at.
        let content_type = response.header("content-type").unwrap_or("").trim();
        if !content_type.is_empty() && !HTML_CONTENT_TYPE_RE.is_match(content_type) {
            return content_type.to_string();
        }

        if let Some(caps) = TITLE_RE.captures(&response.body) {
            let text = collapse_whitespace(&decode_entities(caps[1].trim()));
            if !text.is_empty() {
                return text;
            }
        }

        if response.is_error() {
            if self.show_errors {
                response.status_line()
            } else {
                GENERIC_ERROR.to_string()
            }
        } else {
            NO_TITLE.to_string()
        }
    }
}

/// Decode the HTML entities that commonly appear in title text.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
