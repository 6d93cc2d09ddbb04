//! Renderer hook chain
//!
//! Externally supplied handlers get first refusal on every parsed URL,
//! before IP/TLD/scheme validation. A handler that claims a URL owns all
//! output for it; the default shorten/cache/title pipeline is skipped.

use std::sync::Arc;

use crate::normalize::ParsedUrl;

/// A handler capable of claiming full responsibility for a parsed URL
pub trait UrlRenderer: Send + Sync {
    /// Attempt to render `url`. Returning true claims the URL: the
    /// handler is responsible for any outgoing message, and pipeline
    /// processing of this candidate stops.
    fn try_render(&self, url: &ParsedUrl) -> bool;
}

/// Ordered chain of renderer hooks
#[derive(Default)]
pub struct RendererChain {
    handlers: Vec<Arc<dyn UrlRenderer>>,
}

impl RendererChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Registering the same instance twice has no
    /// additional effect.
    pub fn register(&mut self, handler: Arc<dyn UrlRenderer>) {
        if !self.handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            self.handlers.push(handler);
        }
    }

    /// Offer `url` to each handler in registration order; true when one
    /// of them claimed it.
    pub fn dispatch(&self, url: &ParsedUrl) -> bool {
        self.handlers.iter().any(|h| h.try_render(url))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
