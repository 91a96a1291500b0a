//! The strategy cascade.
//!
//! Runs strategies in priority order, merging each one's new keywords into a
//! single ordered set, and stops invoking strategies as soon as
//! a full snapshot's worth of unique keywords exist. The last two strategies are
//! deterministic, so a run always ends with a full snapshot.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use shoptrends_core::{AppConfig, Error, Normalizer, Snapshot, SnapshotProducer};

use crate::extract::KeywordSelectors;
use crate::fetch::PageFetcher;
use crate::strategy::{
    ApiStrategy, CascadeRun, CuratedStrategy, EmbeddedDataStrategy, PageSource, Strategy, StructuralStrategy,
    SyntheticFillerStrategy,
};

/// How much one strategy added during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub strategy: &'static str,
    pub added: usize,
}

/// Ordered strategy list plus the normalizer that finalizes its output.
pub struct Cascade {
    strategies: Vec<Box<dyn Strategy>>,
    normalizer: Normalizer,
    timezone: Tz,
}

impl Cascade {
    pub fn new(strategies: Vec<Box<dyn Strategy>>, normalizer: Normalizer, timezone: Tz) -> Self {
        Self { strategies, normalizer, timezone }
    }

    /// Build the standard five-strategy cascade.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a configured selector does not parse.
    pub fn from_config(config: &AppConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self, Error> {
        let normalizer = Normalizer::from_config(config);
        let selectors = KeywordSelectors::parse(&config.selectors)?;
        let page = Arc::new(PageSource::new(Arc::clone(&fetcher), &config.source_url));

        let mut api = ApiStrategy::new(fetcher, &config.api_url, config.json_keys.clone(), &config.category);
        if let Some((client_id, client_secret)) = config.api_credentials() {
            api = api.with_credentials(client_id, client_secret);
        }

        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(StructuralStrategy::new(Arc::clone(&page), selectors, &config.category)),
            Box::new(EmbeddedDataStrategy::new(page, config.json_keys.clone(), &config.category)),
            Box::new(api),
            Box::new(CuratedStrategy::new(&config.category)),
            Box::new(SyntheticFillerStrategy::new(normalizer.clone())),
        ];

        Ok(Self::new(strategies, normalizer, config.tz()))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the cascade once, returning the snapshot and per-strategy contributions.
    pub async fn run_with_report(&self) -> (Snapshot, Vec<Contribution>) {
        let updated_at = Utc::now().with_timezone(&self.timezone).fixed_offset();
        let start = Instant::now();
        let mut run = CascadeRun::new();
        let mut report = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            if run.is_full() {
                tracing::debug!(strategy = strategy.name(), "snapshot full; skipping remaining strategies");
                break;
            }

            let candidates = strategy.attempt(&run).await;
            let added = run.absorb(candidates);
            tracing::info!(strategy = strategy.name(), added, total = run.len(), "strategy finished");
            report.push(Contribution { strategy: strategy.name(), added });
        }

        let collected = run.len();
        let snapshot = self.normalizer.finalize(run.into_candidates(), updated_at);
        tracing::info!(
            collected,
            entries = snapshot.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "cascade finished"
        );

        (snapshot, report)
    }

    /// Run the cascade once.
    pub async fn run(&self) -> Snapshot {
        self.run_with_report().await.0
    }
}

#[async_trait]
impl SnapshotProducer for Cascade {
    async fn produce(&self) -> Snapshot {
        self.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::CURATED_KEYWORDS;
    use crate::strategy::tests::StubFetcher;
    use shoptrends_core::{CacheStore, SNAPSHOT_SIZE, TrendChange};
    use std::collections::HashSet;
    use std::time::Duration;

    const HOME: &str = "https://shopping.naver.com/home";
    const API: &str = "https://openapi.naver.com/v1/search/shop.json";

    fn assert_valid(snapshot: &Snapshot) {
        assert_eq!(snapshot.len(), SNAPSHOT_SIZE);
        let ranks: Vec<u32> = snapshot.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=SNAPSHOT_SIZE as u32).collect::<Vec<_>>());
        let keywords: HashSet<&str> = snapshot.entries.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(keywords.len(), SNAPSHOT_SIZE);
        assert!(snapshot.entries.windows(2).all(|w| w[0].search_count >= w[1].search_count));
        assert!(snapshot.entries.iter().all(|e| e.updated_at == snapshot.updated_at));
    }

    fn page_with(count: usize) -> String {
        let links: String = (0..count)
            .map(|i| format!("<li><a class=\"keyword\" href=\"/search?q={i}\">live keyword {i}</a></li>"))
            .collect();
        format!(
            r#"<html><head><script type="application/json">{{"popular": ["embedded one", "embedded two"]}}</script></head>
            <body><ol>{links}</ol></body></html>"#
        )
    }

    fn cascade(fetcher: Arc<StubFetcher>, config: &AppConfig) -> Cascade {
        Cascade::from_config(config, fetcher).unwrap()
    }

    #[test]
    fn test_strategy_order() {
        let cascade = cascade(Arc::new(StubFetcher::default()), &AppConfig::default());
        assert_eq!(
            cascade.strategy_names(),
            vec!["structural", "embedded_data", "indirect_api", "curated", "synthetic_filler"]
        );
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = AppConfig { selectors: vec!["a[[".into()], ..Default::default() };
        let result = Cascade::from_config(&config, Arc::new(StubFetcher::default()));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_total_network_failure_uses_fallbacks() {
        let cascade = cascade(Arc::new(StubFetcher::default()), &AppConfig::default());
        let (snapshot, report) = cascade.run_with_report().await;

        assert_valid(&snapshot);
        assert!(snapshot.entries.iter().all(|e| e.trend_change == TrendChange::Stable));
        let curated: HashSet<&str> = CURATED_KEYWORDS.iter().copied().collect();
        assert!(snapshot.entries.iter().all(|e| curated.contains(e.keyword.as_str())));
        assert_eq!(snapshot.entries[0].keyword, CURATED_KEYWORDS[0]);
        assert_eq!(snapshot.entries[0].search_count, 10_000);
        assert_eq!(snapshot.entries[99].search_count, 5_050);

        let added: Vec<usize> = report.iter().map(|c| c.added).collect();
        assert_eq!(added, vec![0, 0, 0, SNAPSHOT_SIZE]);
    }

    #[tokio::test]
    async fn test_short_circuits_when_page_is_full() {
        let fetcher = Arc::new(StubFetcher::default().with(HOME, &page_with(120)));
        let config = AppConfig {
            api_client_id: Some("id".into()),
            api_client_secret: Some("secret".into()),
            ..Default::default()
        };
        let (snapshot, report) = cascade(fetcher.clone(), &config).run_with_report().await;

        assert_valid(&snapshot);
        assert_eq!(report, vec![Contribution { strategy: "structural", added: SNAPSHOT_SIZE }]);
        assert_eq!(snapshot.entries[0].keyword, "live keyword 0");
        assert_eq!(snapshot.entries[99].keyword, "live keyword 99");
        assert!(snapshot.entries.iter().all(|e| e.category == "쇼핑"));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_live_results_are_topped_up() {
        let api_body = r#"{"items": {"keywords": ["api keyword", "live keyword 1"]}}"#;
        let fetcher = Arc::new(StubFetcher::default().with(HOME, &page_with(3)).with(API, api_body));
        let config = AppConfig {
            api_client_id: Some("id".into()),
            api_client_secret: Some("secret".into()),
            ..Default::default()
        };
        let (snapshot, report) = cascade(fetcher.clone(), &config).run_with_report().await;

        assert_valid(&snapshot);
        let head: Vec<&str> = snapshot.entries.iter().take(7).map(|e| e.keyword.as_str()).collect();
        assert_eq!(
            head,
            vec![
                "live keyword 0",
                "live keyword 1",
                "live keyword 2",
                "embedded one",
                "embedded two",
                "api keyword",
                CURATED_KEYWORDS[0],
            ]
        );
        let added: Vec<usize> = report.iter().map(|c| c.added).collect();
        assert_eq!(added, vec![3, 2, 1, SNAPSHOT_SIZE - 6]);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_synthetic_filler_backstops_short_fallback() {
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(StructuralStrategy::new(
                Arc::new(PageSource::new(Arc::new(StubFetcher::default()), HOME)),
                KeywordSelectors::parse(&[".keyword"]).unwrap(),
                "쇼핑",
            )),
            Box::new(SyntheticFillerStrategy::new(Normalizer::default())),
        ];
        let cascade = Cascade::new(strategies, Normalizer::default(), Tz::Asia__Seoul);
        let (snapshot, report) = cascade.run_with_report().await;

        assert_valid(&snapshot);
        assert_eq!(snapshot.entries[0].keyword, "트렌드 1");
        assert!(snapshot.entries.iter().all(|e| e.category == "기타"));
        assert_eq!(report[1], Contribution { strategy: "synthetic_filler", added: SNAPSHOT_SIZE });
    }

    #[tokio::test]
    async fn test_repeat_runs_are_deterministic() {
        let fetcher = Arc::new(StubFetcher::default().with(HOME, &page_with(40)));
        let cascade = cascade(fetcher, &AppConfig::default());

        let first = cascade.run().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = cascade.run().await;

        assert_valid(&first);
        assert_valid(&second);
        let shape = |s: &Snapshot| {
            s.entries.iter().map(|e| (e.rank, e.keyword.clone(), e.search_count)).collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
        assert_ne!(first.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_timestamps_use_configured_timezone() {
        let cascade = cascade(Arc::new(StubFetcher::default()), &AppConfig::default());
        let snapshot = cascade.run().await;
        assert_eq!(snapshot.updated_at.offset().local_minus_utc(), 9 * 3600);
        assert!(snapshot.updated_at.to_rfc3339().ends_with("+09:00"));
    }

    #[tokio::test]
    async fn test_cascade_as_cache_producer() {
        let fetcher = Arc::new(StubFetcher::default());
        let store = CacheStore::new(Arc::new(cascade(fetcher.clone(), &AppConfig::default())));

        let snapshot = store.read().await;
        assert_valid(&snapshot);
        assert_eq!(fetcher.calls(), 1);
    }
}
