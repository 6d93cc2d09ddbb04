//! Known top-level domain set
//!
//! Loaded once at startup from a newline-delimited file, falling back to
//! the bundled list. The set is never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

/// A configured list must supply at least this many entries before it
/// replaces the bundled defaults.
const MIN_CONFIGURED: usize = 7;

/// Bundled fallback list: generic TLDs plus common country codes.
const DEFAULT_TLDS: &[&str] = &[
    "aero", "arpa", "asia", "biz", "cat", "com", "coop", "edu", "gov", "info", "int", "jobs",
    "mil", "mobi", "museum", "name", "net", "org", "pro", "tel", "travel", "xxx", "ad", "ae",
    "ar", "at", "au", "be", "br", "ca", "ch", "cl", "cn", "co", "cz", "de", "dk", "es", "eu",
    "fi", "fm", "fr", "gr", "hk", "hu", "id", "ie", "il", "in", "io", "is", "it", "jp", "kr",
    "ly", "me", "mx", "nl", "no", "nz", "pl", "pt", "ro", "ru", "se", "sg", "sh", "su", "th",
    "tr", "tv", "tw", "ua", "uk", "us", "uy", "vn", "za",
];

/// Immutable set of known TLDs
#[derive(Debug, Clone, Default)]
pub struct TldSet {
    tlds: HashSet<String>,
}

impl TldSet {
    /// Load the set from a newline-delimited file. Falls back to the
    /// bundled list when no file is given, the file cannot be read, or
    /// it yields fewer than `MIN_CONFIGURED` entries.
    pub fn load(path: Option<&Path>) -> Self {
        let mut tlds = HashSet::new();

        if let Some(path) = path {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    for line in content.lines() {
                        let line = line.trim();
                        if line.is_empty() || line.starts_with('#') {
                            continue;
                        }
                        tlds.insert(line.to_lowercase());
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read TLD list, using bundled defaults");
                }
            }
        }

        if tlds.len() < MIN_CONFIGURED {
            tlds = DEFAULT_TLDS.iter().map(|t| t.to_string()).collect();
        }

        Self { tlds }
    }

    /// Build a set from explicit entries, lower-casing each.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tlds: entries
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, tld: &str) -> bool {
        self.tlds.contains(tld)
    }

    pub fn len(&self) -> usize {
        self.tlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tlds.is_empty()
    }
}
