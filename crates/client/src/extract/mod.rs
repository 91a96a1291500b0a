//! Keyword extraction from fetched documents.
//!
//! ### Structural Extraction
//! - Runs a configurable list of CSS selectors over the parsed page.
//! - Each match yields the first non-empty of: `data-keyword` attribute,
//!   element text, `title` attribute.
//!
//! ### Embedded Data
//! - Parses `<script type="application/json">` payloads.
//! - Collects string items from arrays stored under configured keys,
//!   at any nesting depth.
//!
//! Both passes trim candidates, drop anything of one character or less, and
//! drop repeats. Neither pass performs network I/O.

pub mod embedded;
pub mod selectors;

pub use embedded::{extract_embedded_keywords, keywords_from_json};
pub use selectors::{KeywordSelectors, extract_keywords};

use std::collections::HashSet;

use shoptrends_core::normalize::clean_keyword;

/// Ordered, duplicate-free keyword collector with a size cap.
#[derive(Debug, Default)]
pub(crate) struct KeywordSink {
    seen: HashSet<String>,
    keywords: Vec<String>,
    limit: usize,
}

impl KeywordSink {
    pub(crate) fn new(limit: usize) -> Self {
        Self { seen: HashSet::new(), keywords: Vec::new(), limit }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.keywords.len() >= self.limit
    }

    /// Offer a raw value; returns whether it was kept.
    pub(crate) fn offer(&mut self, raw: &str) -> bool {
        if self.is_full() {
            return false;
        }
        match clean_keyword(raw) {
            Some(keyword) if self.seen.insert(keyword.to_string()) => {
                self.keywords.push(keyword.to_string());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn into_keywords(self) -> Vec<String> {
        self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_dedups_and_caps() {
        let mut sink = KeywordSink::new(2);
        assert!(sink.offer(" 노트북 "));
        assert!(!sink.offer("노트북"));
        assert!(!sink.offer("x"));
        assert!(sink.offer("Mouse"));
        assert!(sink.is_full());
        assert!(!sink.offer("Keyboard"));
        assert_eq!(sink.into_keywords(), vec!["노트북", "Mouse"]);
    }
}
