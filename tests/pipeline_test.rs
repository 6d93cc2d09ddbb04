//! Integration tests for linkscan
//!
//! These tests drive the full message pipeline end to end against a
//! scripted fetcher standing in for the web.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use linkscan::fetch::{FetchError, FetchResponse, PageFetcher};
use linkscan::normalize::ParsedUrl;
use linkscan::render::UrlRenderer;
use linkscan::{Config, LinkProcessor};

/// Fetcher that serves pre-scripted responses by exact URL and 404s
/// everything else
struct ScriptedWeb {
    pages: HashMap<String, FetchResponse>,
}

impl ScriptedWeb {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    /// Serve an HTML page with the given title at `url`.
    fn page(mut self, url: &str, title: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                status: 200,
                headers: vec![(
                    "content-type".to_string(),
                    "text/html; charset=utf-8".to_string(),
                )],
                body: format!("<html><head><title>{}</title></head></html>", title),
            },
        );
        self
    }

    /// Serve a plain-text body at `url`, as shortener endpoints do.
    fn text(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                status: 200,
                headers: vec![("content-type".to_string(), "text/plain".to_string())],
                body: body.to_string(),
            },
        );
        self
    }

    fn into_fetcher(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl PageFetcher for ScriptedWeb {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        match self.pages.get(url) {
            Some(response) => Ok(response.clone()),
            None => Ok(FetchResponse {
                status: 404,
                headers: vec![("content-type".to_string(), "text/html".to_string())],
                body: String::new(),
            }),
        }
    }
}

#[tokio::test]
async fn two_links_one_message() {
    let web = ScriptedWeb::new()
        .page("http://example.com/a", "Page A")
        .page("http://example.org/b", "Page B")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&Config::default(), web).unwrap();

    let out = proc
        .process_message(
            "#chan",
            "alice",
            "see http://example.com/a and http://example.org/b",
        )
        .await;

    // Without merge mode the wrapper repeats once per link, each copy
    // carrying the full joined body.
    let expected = "[ http://example.com/a ] Page A; [ http://example.org/b ] Page B";
    assert_eq!(out, vec![expected, expected]);
}

#[tokio::test]
async fn merge_mode_emits_once() {
    let mut config = Config::default();
    config.merge_links = true;

    let web = ScriptedWeb::new()
        .page("http://example.com/a", "Page A")
        .page("http://example.org/b", "Page B")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message(
            "#chan",
            "alice",
            "see http://example.com/a and http://example.org/b",
        )
        .await;
    assert_eq!(
        out,
        vec!["[ http://example.com/a ] Page A; [ http://example.org/b ] Page B"]
    );
}

#[tokio::test]
async fn shortened_links_are_displayed_and_deduped() {
    let mut config = Config::default();
    config.shortener = "isgd".to_string();

    let web = ScriptedWeb::new()
        .page("http://example.com/long/path", "Long Page")
        .text(
            "https://is.gd/api.php?longurl=http%3A%2F%2Fexample%2Ecom%2Flong%2Fpath",
            "https://is.gd/abc12\n",
        )
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message("#chan", "alice", "http://example.com/long/path")
        .await;
    assert_eq!(out, vec!["[ https://is.gd/abc12 ] Long Page"]);

    // reposting the same link is suppressed
    let again = proc
        .process_message("#chan", "bob", "http://example.com/long/path")
        .await;
    assert!(again.is_empty());
}

#[tokio::test]
async fn schemeless_domain_round_trip() {
    let mut config = Config::default();
    config.detect_schemeless = true;

    let web = ScriptedWeb::new()
        .page("http://www.example.com/", "Example Domain")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message("#chan", "alice", "have a look at www.example.com sometime")
        .await;
    assert_eq!(out, vec!["[ http://www.example.com/ ] Example Domain"]);

    // the www form and the bare domain share a base identity
    let repeat = proc
        .process_message("#chan", "bob", "http://example.com/")
        .await;
    assert!(repeat.is_empty());
}

#[tokio::test]
async fn renderer_hook_owns_its_urls() {
    struct VideoHook;
    impl UrlRenderer for VideoHook {
        fn try_render(&self, url: &ParsedUrl) -> bool {
            url.host.ends_with("video.example")
        }
    }

    let web = ScriptedWeb::new()
        .page("http://example.com/a", "Page A")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&Config::default(), web).unwrap();
    proc.register_renderer(Arc::new(VideoHook));

    let out = proc
        .process_message(
            "#chan",
            "alice",
            "http://clips.video.example/42 and http://example.com/a",
        )
        .await;

    // the hook claimed the first link; only the second flows through
    assert_eq!(out, vec!["[ http://example.com/a ] Page A"]);
}

#[tokio::test]
async fn missing_page_reports_status_when_enabled() {
    let mut config = Config::default();
    config.show_errors = true;

    let web = ScriptedWeb::new().into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message("#chan", "alice", "http://example.com/gone")
        .await;
    assert_eq!(out, vec!["[ http://example.com/gone ] 404 Not Found"]);
}

#[tokio::test]
async fn https_falls_back_to_http_when_configured() {
    let mut config = Config::default();
    config.ssl_available = false;
    config.ssl_fallback = true;

    let web = ScriptedWeb::new()
        .page("http://example.com/secure", "Now Plain")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message("#chan", "alice", "https://example.com/secure")
        .await;
    assert_eq!(out, vec!["[ http://example.com/secure ] Now Plain"]);
}

#[tokio::test]
async fn https_is_dropped_without_fallback() {
    let mut config = Config::default();
    config.ssl_available = false;
    config.ssl_fallback = false;

    let web = ScriptedWeb::new()
        .page("http://example.com/secure", "Now Plain")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    let out = proc
        .process_message("#chan", "alice", "https://example.com/secure")
        .await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn unknown_tld_is_ignored() {
    let web = ScriptedWeb::new()
        .page("http://example.com/", "Example")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&Config::default(), web).unwrap();

    let out = proc
        .process_message(
            "#chan",
            "alice",
            "http://router.localdomain/admin then http://example.com/",
        )
        .await;
    assert_eq!(out, vec!["[ http://example.com/ ] Example"]);
}

#[tokio::test]
async fn no_expiry_mode_never_forgets() {
    let mut config = Config::default();
    config.expire_seconds = 0;

    let web = ScriptedWeb::new()
        .page("http://example.com/", "Example")
        .into_fetcher();
    let mut proc = LinkProcessor::new(&config, web).unwrap();

    proc.process_message("#chan", "alice", "http://example.com/").await;
    let repeat = proc
        .process_message("#chan", "alice", "http://example.com/")
        .await;
    assert!(repeat.is_empty());
}
