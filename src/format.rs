//! Outgoing message formatting
//!
//! Substitutes `%title%`, `%link%`, and `%nick%` into the per-link
//! template, then wraps the joined result in the outer template
//! according to the merge policy.

use crate::types::MatchResult;

/// Renders per-URL results into outgoing chat messages
pub struct MessageFormatter {
    base_format: String,
    message_format: String,
    merge_links: bool,
}

impl MessageFormatter {
    pub fn new(base_format: String, message_format: String, merge_links: bool) -> Self {
        Self {
            base_format,
            message_format,
            merge_links,
        }
    }

    /// Produce the outgoing messages for one processed inbound message.
    pub fn render(&self, nick: &str, results: &[MatchResult]) -> Vec<String> {
        if results.is_empty() {
            return Vec::new();
        }

        let per_link: Vec<String> = results
            .iter()
            .map(|result| {
                self.message_format
                    .replace("%title%", &result.title)
                    .replace("%link%", result.display_url())
                    .replace("%nick%", nick)
            })
            .collect();
        let joined = per_link.join("; ");

        let wrap = |body: &str| {
            self.base_format
                .replace("%message%", body)
                .replace("%nick%", nick)
        };

        if self.merge_links {
            vec![wrap(&joined)]
        } else {
            // Non-merge mode repeats only the outer wrapper; each
            // message still carries the full joined body.
            results.iter().map(|_| wrap(&joined)).collect()
        }
    }
}
