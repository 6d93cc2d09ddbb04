//! Candidate validation
//!
//! Sequential rejection checks, each with a distinct reason. A rejection
//! is local to the candidate: the message pass continues with the next
//! match.

use thiserror::Error;

use crate::extract::UrlCandidate;
use crate::normalize::ParsedUrl;
use crate::tld::TldSet;

/// Reasons a candidate is dropped from the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("looks like an email address or filesystem path")]
    LooksLikeEmailOrPath,
    #[error("malformed URL")]
    MalformedUrl,
    #[error("invalid IP literal")]
    InvalidIp,
    #[error("unknown TLD '{0}'")]
    UnknownTld(String),
    #[error("secure transport unavailable")]
    SecureTransportUnavailable,
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("URL shortening failed")]
    ShortenFailed,
    #[error("link was posted recently")]
    CacheSuppressed,
}

/// Host and scheme checks applied after parsing
pub struct Validator {
    tlds: TldSet,
    ssl_fallback: bool,
    ssl_available: bool,
}

impl Validator {
    pub fn new(tlds: TldSet, ssl_fallback: bool, ssl_available: bool) -> Self {
        Self {
            tlds,
            ssl_fallback,
            ssl_available,
        }
    }

    /// Validate a parsed candidate. May downgrade `https` to `http` when
    /// secure transport is unavailable and fallback is enabled.
    pub fn check(&self, candidate: &UrlCandidate, parsed: &mut ParsedUrl) -> Result<(), Rejection> {
        if candidate.is_ip_literal {
            if !is_strict_dotted_quad(&parsed.host) {
                return Err(Rejection::InvalidIp);
            }
        } else {
            let tld = parsed.tld().to_lowercase();
            if !self.tlds.is_empty() && !self.tlds.contains(&tld) {
                return Err(Rejection::UnknownTld(tld));
            }
        }

        if parsed.scheme == "https" && !self.ssl_available {
            if !self.ssl_fallback {
                return Err(Rejection::SecureTransportUnavailable);
            }
            parsed.scheme = "http".to_string();
        }

        if parsed.scheme != "http" && parsed.scheme != "https" {
            return Err(Rejection::UnsupportedScheme(parsed.scheme.clone()));
        }

        Ok(())
    }
}

/// Strict dotted-quad check: exactly four all-digit octets, each 0-255.
pub(crate) fn is_strict_dotted_quad(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    if octets.len() != 4 {
        return false;
    }
    octets.iter().all(|octet| {
        !octet.is_empty()
            && octet.bytes().all(|b| b.is_ascii_digit())
            && octet.parse::<u8>().is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip_candidate(text: &str) -> UrlCandidate {
        UrlCandidate {
            text: text.to_string(),
            is_ip_literal: true,
            email_or_path: false,
        }
    }

    fn domain_candidate(text: &str) -> UrlCandidate {
        UrlCandidate {
            text: text.to_string(),
            is_ip_literal: false,
            email_or_path: false,
        }
    }

    fn default_validator() -> Validator {
        Validator::new(TldSet::load(None), false, true)
    }

    #[test]
    fn dotted_quad_bounds() {
        assert!(is_strict_dotted_quad("0.0.0.0"));
        assert!(is_strict_dotted_quad("255.255.255.255"));
        assert!(is_strict_dotted_quad("192.168.0.1"));
        assert!(!is_strict_dotted_quad("256.1.1.1"));
        assert!(!is_strict_dotted_quad("1.2.3"));
        assert!(!is_strict_dotted_quad("1.2.3.4.5"));
        assert!(!is_strict_dotted_quad("1.2.3.x"));
        assert!(!is_strict_dotted_quad("1.2.3."));
        assert!(!is_strict_dotted_quad("+1.2.3.4"));
    }

    #[test]
    fn octet_out_of_range_is_rejected() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("http://256.1.1.1/").unwrap();
        assert_eq!(
            validator.check(&ip_candidate("256.1.1.1"), &mut parsed),
            Err(Rejection::InvalidIp)
        );
    }

    #[test]
    fn valid_ip_passes() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("http://10.0.0.1/").unwrap();
        assert!(validator.check(&ip_candidate("10.0.0.1"), &mut parsed).is_ok());
    }

    #[test]
    fn unknown_tld_is_rejected() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("http://example.invalid/").unwrap();
        assert_eq!(
            validator.check(&domain_candidate("example.invalid"), &mut parsed),
            Err(Rejection::UnknownTld("invalid".to_string()))
        );
    }

    #[test]
    fn tld_comparison_is_case_insensitive() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("http://EXAMPLE.COM/").unwrap();
        assert!(validator
            .check(&domain_candidate("EXAMPLE.COM"), &mut parsed)
            .is_ok());
    }

    #[test]
    fn https_downgrades_when_fallback_enabled() {
        let validator = Validator::new(TldSet::load(None), true, false);
        let mut parsed = ParsedUrl::parse("https://example.com/").unwrap();
        assert!(validator
            .check(&domain_candidate("example.com"), &mut parsed)
            .is_ok());
        assert_eq!(parsed.scheme, "http");
    }

    #[test]
    fn https_rejected_without_fallback() {
        let validator = Validator::new(TldSet::load(None), false, false);
        let mut parsed = ParsedUrl::parse("https://example.com/").unwrap();
        assert_eq!(
            validator.check(&domain_candidate("example.com"), &mut parsed),
            Err(Rejection::SecureTransportUnavailable)
        );
    }

    #[test]
    fn https_passes_when_available() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("https://example.com/").unwrap();
        assert!(validator
            .check(&domain_candidate("example.com"), &mut parsed)
            .is_ok());
        assert_eq!(parsed.scheme, "https");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let validator = default_validator();
        let mut parsed = ParsedUrl::parse("ftp://example.com/file").unwrap();
        assert_eq!(
            validator.check(&domain_candidate("ftp://example.com/file"), &mut parsed),
            Err(Rejection::UnsupportedScheme("ftp".to_string()))
        );
    }
}
