//! Per-channel deduplication of recently seen links
//!
//! Two namespaces per channel (full URL and shortened URL), each mapping
//! a link checksum to the instant it was last seen. Expiry is lazy:
//! stale entries are treated as absent by `seen` but only removed when
//! the per-channel size cap forces an eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use percent_encoding::percent_decode_str;

/// Checksum used as the compact cache key for a link.
///
/// Lower-cases the percent-decoded input, strips all whitespace, and
/// renders the CRC-32 of the result as lower-case hex.
pub fn link_checksum(url: &str) -> String {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let folded: String = decoded
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{:x}", crc32fast::hash(folded.as_bytes()))
}

type ChannelEntries = HashMap<String, Instant>;

/// Tracks which links each channel has seen recently
pub struct RecentLinkCache {
    /// TTL in seconds; zero or negative means entries never expire
    expire_seconds: i64,
    /// Maximum entries per channel per namespace; zero means unbounded
    limit: usize,
    full: HashMap<String, ChannelEntries>,
    short: HashMap<String, ChannelEntries>,
}

impl RecentLinkCache {
    pub fn new(expire_seconds: i64, limit: usize) -> Self {
        Self {
            expire_seconds,
            limit,
            full: HashMap::new(),
            short: HashMap::new(),
        }
    }

    /// Whether either the full or the shortened form of a link is a
    /// recent repeat for this channel.
    pub fn seen(&self, channel: &str, full_url: &str, short_url: &str, now: Instant) -> bool {
        self.hit(&self.full, channel, &link_checksum(full_url), now)
            || self.hit(&self.short, channel, &link_checksum(short_url), now)
    }

    /// Record both forms of a link as seen at `now`.
    pub fn record(&mut self, channel: &str, full_url: &str, short_url: &str, now: Instant) {
        let limit = self.limit;
        Self::insert(&mut self.full, channel, link_checksum(full_url), now, limit);
        Self::insert(&mut self.short, channel, link_checksum(short_url), now, limit);
    }

    fn hit(
        &self,
        namespace: &HashMap<String, ChannelEntries>,
        channel: &str,
        checksum: &str,
        now: Instant,
    ) -> bool {
        let Some(entries) = namespace.get(channel) else {
            return false;
        };
        let Some(last) = entries.get(checksum) else {
            return false;
        };
        if self.expire_seconds <= 0 {
            return true;
        }
        now.duration_since(*last) < Duration::from_secs(self.expire_seconds as u64)
    }

    fn insert(
        namespace: &mut HashMap<String, ChannelEntries>,
        channel: &str,
        checksum: String,
        now: Instant,
        limit: usize,
    ) {
        let entries = namespace.entry(channel.to_string()).or_default();
        entries.insert(checksum, now);

        if limit > 0 && entries.len() > limit {
            let oldest = entries
                .iter()
                .min_by_key(|(_, seen_at)| **seen_at)
                .map(|(checksum, _)| checksum.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
    }
}
