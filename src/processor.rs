//! Message processing pipeline
//!
//! Control flow for one inbound message: extract candidates, then per
//! candidate parse, offer to renderer hooks, validate, shorten, check
//! the dedup cache, resolve a title, record, and finally format the
//! outgoing messages. Candidates are processed sequentially in
//! extraction order; a dropped candidate never aborts the message.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::cache::RecentLinkCache;
use crate::config::Config;
use crate::extract::{UrlCandidate, UrlExtractor};
use crate::fetch::PageFetcher;
use crate::format::MessageFormatter;
use crate::normalize::ParsedUrl;
use crate::render::{RendererChain, UrlRenderer};
use crate::shorten::{build_shortener, UnknownShortener, UrlShortener};
use crate::title::TitleResolver;
use crate::tld::TldSet;
use crate::types::MatchResult;
use crate::validate::{Rejection, Validator};

/// Fatal errors when constructing the pipeline
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    UnknownShortener(#[from] UnknownShortener),
}

/// The link-scanning pipeline for one process
pub struct LinkProcessor {
    extractor: UrlExtractor,
    validator: Validator,
    renderers: RendererChain,
    shortener: Arc<dyn UrlShortener>,
    cache: RecentLinkCache,
    titles: TitleResolver,
    formatter: MessageFormatter,
}

impl LinkProcessor {
    /// Build the pipeline from configuration.
    ///
    /// Fails when the configured shortener name is unknown; the host
    /// must treat that as fatal and refuse to start.
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self, ProcessorError> {
        let shortener = build_shortener(&config.shortener, fetcher.clone())?;
        let tlds = TldSet::load(config.tld_file.as_deref());

        Ok(Self {
            extractor: UrlExtractor::new(config.detect_schemeless),
            validator: Validator::new(tlds, config.ssl_fallback, config.ssl_available),
            renderers: RendererChain::new(),
            shortener,
            cache: RecentLinkCache::new(config.expire_seconds, config.cache_limit),
            titles: TitleResolver::new(fetcher, config.title_length, config.show_errors),
            formatter: MessageFormatter::new(
                config.base_format.clone(),
                config.message_format.clone(),
                config.merge_links,
            ),
        })
    }

    /// Append a renderer hook. Registering the same instance twice has
    /// no additional effect.
    pub fn register_renderer(&mut self, handler: Arc<dyn UrlRenderer>) {
        self.renderers.register(handler);
    }

    /// Process one inbound message and return the outgoing messages,
    /// zero or more.
    pub async fn process_message(&mut self, channel: &str, nick: &str, text: &str) -> Vec<String> {
        let candidates: Vec<UrlCandidate> = self.extractor.extract(text).collect();

        let mut results = Vec::new();
        for candidate in &candidates {
            match self.process_candidate(channel, candidate).await {
                Ok(Some(result)) => results.push(result),
                // claimed by a renderer hook; it owns the output
                Ok(None) => {}
                Err(reason) => {
                    debug!(channel, url = %candidate.text, %reason, "candidate dropped");
                }
            }
        }

        self.formatter.render(nick, &results)
    }

    async fn process_candidate(
        &mut self,
        channel: &str,
        candidate: &UrlCandidate,
    ) -> Result<Option<MatchResult>, Rejection> {
        if candidate.email_or_path {
            return Err(Rejection::LooksLikeEmailOrPath);
        }

        let mut parsed =
            ParsedUrl::parse(&candidate.text).map_err(|_| Rejection::MalformedUrl)?;

        // Hooks get first refusal, before IP/TLD/scheme validation.
        if self.renderers.dispatch(&parsed) {
            return Ok(None);
        }

        self.validator.check(candidate, &mut parsed)?;

        let canonical = parsed.canonicalize(false);
        let short = self.shortener.shorten(&canonical).await.map_err(|err| {
            debug!(url = %canonical, error = %err, "shortening failed");
            Rejection::ShortenFailed
        })?;

        let base_key = parsed.canonicalize(true);
        let now = Instant::now();
        if self.cache.seen(channel, &base_key, &short, now) {
            return Err(Rejection::CacheSuppressed);
        }

        let title = self.titles.resolve(&canonical).await;
        self.cache.record(channel, &base_key, &short, now);

        let short_url = (short != canonical).then_some(short);
        Ok(Some(MatchResult {
            url: canonical,
            parsed,
            short_url,
            title,
        }))
    }
}
