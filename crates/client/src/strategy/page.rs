//! Strategies reading the shopping home page.

use std::sync::Arc;

use async_trait::async_trait;
use shoptrends_core::{Candidate, Error, SNAPSHOT_SIZE};

use super::{CascadeRun, Strategy};
use crate::extract::{KeywordSelectors, extract_embedded_keywords, extract_keywords};
use crate::fetch::PageFetcher;

/// The page both page-based strategies read.
pub struct PageSource {
    fetcher: Arc<dyn PageFetcher>,
    url: String,
}

impl PageSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>, url: impl Into<String>) -> Self {
        Self { fetcher, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) async fn load(&self) -> Result<Arc<str>, Error> {
        let body = self.fetcher.get_text(&self.url, &[]).await?;
        Ok(Arc::from(body))
    }
}

/// Primary strategy: CSS selectors over the page markup.
pub struct StructuralStrategy {
    source: Arc<PageSource>,
    selectors: KeywordSelectors,
    category: String,
}

impl StructuralStrategy {
    pub fn new(source: Arc<PageSource>, selectors: KeywordSelectors, category: impl Into<String>) -> Self {
        Self { source, selectors, category: category.into() }
    }
}

#[async_trait]
impl Strategy for StructuralStrategy {
    fn name(&self) -> &'static str {
        "structural"
    }

    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error> {
        let html = run.page(&self.source).await?;
        let keywords = extract_keywords(&html, &self.selectors, SNAPSHOT_SIZE);
        tracing::debug!(url = self.source.url(), found = keywords.len(), "structural extraction finished");

        Ok(keywords
            .into_iter()
            .filter(|keyword| !run.contains(keyword))
            .map(|keyword| Candidate::keyword(keyword).with_category(&self.category))
            .collect())
    }
}

/// Secondary strategy: JSON payloads embedded in the same page.
pub struct EmbeddedDataStrategy {
    source: Arc<PageSource>,
    json_keys: Vec<String>,
    category: String,
}

impl EmbeddedDataStrategy {
    pub fn new(source: Arc<PageSource>, json_keys: Vec<String>, category: impl Into<String>) -> Self {
        Self { source, json_keys, category: category.into() }
    }
}

#[async_trait]
impl Strategy for EmbeddedDataStrategy {
    fn name(&self) -> &'static str {
        "embedded_data"
    }

    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error> {
        let html = run.page(&self.source).await?;
        let keywords = extract_embedded_keywords(&html, &self.json_keys, SNAPSHOT_SIZE);
        tracing::debug!(url = self.source.url(), found = keywords.len(), "embedded data extraction finished");

        Ok(keywords
            .into_iter()
            .filter(|keyword| !run.contains(keyword))
            .map(|keyword| Candidate::keyword(keyword).with_category(&self.category))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::StubFetcher;
    use shoptrends_core::AppConfig;

    const URL: &str = "https://shop.test/home";

    const PAGE: &str = r#"
        <html>
        <head>
            <script type="application/json">{"keywords": ["선풍기", "제습기", "수영복"]}</script>
        </head>
        <body>
            <ol class="popular">
                <li><a class="keyword" href="/search?q=1">선풍기</a></li>
                <li><a class="keyword" href="/search?q=2">에어컨</a></li>
            </ol>
        </body>
        </html>
    "#;

    fn source(fetcher: Arc<StubFetcher>) -> Arc<PageSource> {
        Arc::new(PageSource::new(fetcher, URL))
    }

    fn selectors() -> KeywordSelectors {
        KeywordSelectors::parse(&AppConfig::default().selectors).unwrap()
    }

    fn keys() -> Vec<String> {
        AppConfig::default().json_keys
    }

    #[tokio::test]
    async fn test_structural_collects_page_keywords() {
        let fetcher = Arc::new(StubFetcher::default().with(URL, PAGE));
        let strategy = StructuralStrategy::new(source(fetcher), selectors(), "쇼핑");

        let candidates = strategy.collect(&CascadeRun::new()).await.unwrap();
        let keywords: Vec<&str> = candidates.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["선풍기", "에어컨"]);
        assert!(candidates.iter().all(|c| c.category.as_deref() == Some("쇼핑")));
    }

    #[tokio::test]
    async fn test_embedded_skips_collected() {
        let fetcher = Arc::new(StubFetcher::default().with(URL, PAGE));
        let page = source(fetcher.clone());
        let structural = StructuralStrategy::new(Arc::clone(&page), selectors(), "쇼핑");
        let embedded = EmbeddedDataStrategy::new(page, keys(), "쇼핑");

        let mut run = CascadeRun::new();
        let found = structural.attempt(&run).await;
        run.absorb(found);

        let candidates = embedded.collect(&run).await.unwrap();
        let keywords: Vec<&str> = candidates.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["제습기", "수영복"]);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_strategies_fail_on_network_error() {
        let fetcher = Arc::new(StubFetcher::default());
        let page = source(fetcher);
        let run = CascadeRun::new();

        let structural = StructuralStrategy::new(Arc::clone(&page), selectors(), "쇼핑");
        assert!(matches!(structural.collect(&run).await, Err(Error::Network(_))));
        assert!(structural.attempt(&run).await.is_empty());

        let embedded = EmbeddedDataStrategy::new(page, keys(), "쇼핑");
        assert!(embedded.attempt(&run).await.is_empty());
    }
}
