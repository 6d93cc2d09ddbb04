//! URL extraction from chat text
//!
//! Scans raw message text with a single combined pattern that matches
//! either a dotted-quad IP host or a domain-name host, each with an
//! optional scheme prefix. Bare domains with no scheme are only matched
//! when schemeless detection is enabled, and are flagged as suspect when
//! the surrounding text suggests an email address or filesystem path.

use regex::Regex;

/// Characters stripped from the end of a match, repeatedly.
const TRAILING_JUNK: &[char] = &[',', ' ', ']', '.', '?', '!', ';'];

/// Characters that mark a schemeless match as part of an email address or
/// filesystem path when they immediately precede it.
const SUSPECT_PRECEDERS: &[char] = &['@', '/', '\\'];

const SCHEME: &str = r"[a-zA-Z][a-zA-Z0-9+.-]*://";
const IP_HOST: &str = r"(?:\d{1,3}\.){3}\d{1,3}";
const DOMAIN_HOST: &str = r"(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,12}";
const TAIL: &str = r"(?::\d{1,5})?(?:[/?#][^\s]*)?";

/// A URL-like substring found in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCandidate {
    /// The matched substring, trimmed of trailing punctuation
    pub text: String,
    /// Whether the host portion is a dotted-quad IP literal
    pub is_ip_literal: bool,
    /// Whether the match was immediately preceded by an email or path
    /// indicator character
    pub email_or_path: bool,
}

/// Scans message text for URL candidates
pub struct UrlExtractor {
    pattern: Regex,
    detect_schemeless: bool,
}

impl UrlExtractor {
    /// Build an extractor, compiling the combined pattern once.
    pub fn new(detect_schemeless: bool) -> Self {
        let domain_scheme = if detect_schemeless {
            format!("(?:{SCHEME})?")
        } else {
            format!("(?:{SCHEME})")
        };
        let pattern = format!(
            "(?P<ip>(?:{SCHEME})?{IP_HOST}{TAIL})|(?P<dom>{domain_scheme}{DOMAIN_HOST}{TAIL})"
        );
        Self {
            pattern: Regex::new(&pattern).expect("extraction pattern is valid"),
            detect_schemeless,
        }
    }

    /// Iterate over the URL candidates in `text`, in order of appearance.
    pub fn extract<'a>(&'a self, text: &'a str) -> impl Iterator<Item = UrlCandidate> + 'a {
        self.pattern.captures_iter(text).filter_map(move |caps| {
            let (m, is_ip) = match (caps.name("ip"), caps.name("dom")) {
                (Some(m), _) => (m, true),
                (None, Some(m)) => (m, false),
                (None, None) => return None,
            };

            // An IP match running straight into more label characters is
            // not a URL boundary, e.g. the middle of "1.2.3.4.5".
            if is_ip && !has_clean_boundary(text, m.end()) {
                return None;
            }

            let has_scheme = m.as_str().contains("://");
            let email_or_path = self.detect_schemeless
                && !has_scheme
                && preceded_by_suspect(text, m.start());

            let trimmed = m.as_str().trim().trim_end_matches(TRAILING_JUNK);
            if trimmed.is_empty() {
                return None;
            }

            Some(UrlCandidate {
                text: trimmed.to_string(),
                is_ip_literal: is_ip,
                email_or_path,
            })
        })
    }
}

fn has_clean_boundary(text: &str, end: usize) -> bool {
    let mut rest = text[end..].chars();
    match rest.next() {
        None => true,
        Some(c) if c.is_whitespace() => true,
        Some('.') => !matches!(rest.next(), Some(n) if n.is_alphanumeric()),
        Some(c) if c.is_alphanumeric() => false,
        Some(_) => true,
    }
}

fn preceded_by_suspect(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| SUSPECT_PRECEDERS.contains(&c))
}
