//! Linkscan: link scanning and titling for chat channels
//!
//! Scans inbound chat messages for URLs and turns them into display
//! messages, featuring:
//! - Scheme-aware extraction with optional schemeless detection
//! - Deterministic normalization with a base canonical form
//! - IP, TLD, and scheme validity filtering
//! - Per-channel dedup of recently posted links (checksum keyed)
//! - Pluggable renderer hooks and URL shorteners
//! - Title resolution with bounded fetches and error-signal fallbacks
//!
//! The chat transport is external: the host feeds `process_message` the
//! raw text plus channel and nickname, and delivers whatever messages
//! come back.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod normalize;
pub mod processor;
pub mod render;
pub mod shorten;
pub mod title;
pub mod tld;
pub mod types;
pub mod util;
pub mod validate;

pub use config::Config;
pub use processor::{LinkProcessor, ProcessorError};
pub use types::MatchResult;
