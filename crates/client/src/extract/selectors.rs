//! Selector-driven keyword harvesting from HTML documents.

use scraper::{ElementRef, Html, Selector};
use shoptrends_core::Error;

use super::KeywordSink;

/// Compiled selector list, tried in configuration order.
#[derive(Debug, Clone)]
pub struct KeywordSelectors {
    selectors: Vec<Selector>,
}

impl KeywordSelectors {
    /// Compile selector patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first pattern that fails to parse.
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, Error> {
        let selectors = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Selector::parse(pattern).map_err(|e| Error::InvalidInput(format!("invalid selector {pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { selectors })
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// First non-empty keyword-like value carried by an element.
fn element_keyword(element: &ElementRef<'_>) -> Option<String> {
    let attr = |name: &str| {
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    attr("data-keyword")
        .or_else(|| {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() { None } else { Some(text) }
        })
        .or_else(|| attr("title"))
}

/// Extract up to `limit` unique keywords from an HTML page.
///
/// Selectors are applied in order; within a selector, matches are taken in
/// document order.
pub fn extract_keywords(html: &str, selectors: &KeywordSelectors, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut sink = KeywordSink::new(limit);

    for selector in &selectors.selectors {
        for element in document.select(selector) {
            if sink.is_full() {
                return sink.into_keywords();
            }
            if let Some(keyword) = element_keyword(&element) {
                sink.offer(&keyword);
            }
        }
    }

    sink.into_keywords()
}
