//! Core types shared across the pipeline

use crate::normalize::ParsedUrl;

/// Outcome for one successful URL candidate within a message pass
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Canonical display URL
    pub url: String,
    /// Parsed components
    pub parsed: ParsedUrl,
    /// Shortened URL, when the shortener produced a different form
    pub short_url: Option<String>,
    /// Resolved display title
    pub title: String,
}

impl MatchResult {
    /// URL preferred for display: the shortened form when available.
    pub fn display_url(&self) -> &str {
        self.short_url.as_deref().unwrap_or(&self.url)
    }
}
