//! Configuration for the link scanner

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default user agent for all HTTP requests (title fetches, shorteners)
pub const DEFAULT_USER_AGENT: &str = "linkscan/0.4 (+https://github.com/linkscan/linkscan)";

/// HTTP fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Main configuration, static for the process lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shortener implementation, selected by name
    #[serde(default = "default_shortener")]
    pub shortener: String,
    /// Also match bare domains carrying no scheme
    #[serde(default)]
    pub detect_schemeless: bool,
    /// Outer message template; `%message%` and `%nick%` are substituted
    #[serde(default = "default_base_format")]
    pub base_format: String,
    /// Per-link template; `%title%`, `%link%`, `%nick%` are substituted
    #[serde(default = "default_message_format")]
    pub message_format: String,
    /// Join all links of a message into a single outgoing message
    #[serde(default)]
    pub merge_links: bool,
    /// Maximum title length before truncation
    #[serde(default = "default_title_length")]
    pub title_length: usize,
    /// Include status and transport detail in error titles
    #[serde(default)]
    pub show_errors: bool,
    /// Dedup cache TTL in seconds; zero or negative means no expiry
    #[serde(default = "default_expire_seconds")]
    pub expire_seconds: i64,
    /// Maximum cached links per channel per namespace; zero is unbounded
    #[serde(default = "default_cache_limit")]
    pub cache_limit: usize,
    /// Downgrade https links to http when secure transport is unavailable
    #[serde(default)]
    pub ssl_fallback: bool,
    /// Whether this process can fetch https URLs
    #[serde(default = "default_true")]
    pub ssl_available: bool,
    /// Newline-delimited TLD list; the bundled list is used when unset
    #[serde(default)]
    pub tld_file: Option<PathBuf>,
    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_shortener() -> String {
    "none".to_string()
}

fn default_base_format() -> String {
    "%message%".to_string()
}

fn default_message_format() -> String {
    "[ %link% ] %title%".to_string()
}

fn default_title_length() -> usize {
    40
}

fn default_expire_seconds() -> i64 {
    1800
}

fn default_cache_limit() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortener: default_shortener(),
            detect_schemeless: false,
            base_format: default_base_format(),
            message_format: default_message_format(),
            merge_links: false,
            title_length: default_title_length(),
            show_errors: false,
            expire_seconds: default_expire_seconds(),
            cache_limit: default_cache_limit(),
            ssl_fallback: false,
            ssl_available: true,
            tld_file: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the
    /// user can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.title_length == 0 {
            errors.push("title_length must be positive".to_string());
        }
        if !self.base_format.contains("%message%") {
            errors.push("base_format must contain %message%".to_string());
        }
        if self.message_format.is_empty() {
            errors.push("message_format must not be empty".to_string());
        }
        if self.fetch.timeout_secs == 0 {
            errors.push("fetch timeout_secs must be positive".to_string());
        }
        if self.fetch.user_agent.is_empty() {
            errors.push("fetch user_agent must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
