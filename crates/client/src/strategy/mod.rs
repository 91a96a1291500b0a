//! Extraction strategies.
//!
//! A [`Strategy`] proposes keyword candidates from one source or technique.
//! The cascade calls [`Strategy::attempt`], which never fails: any error from
//! [`Strategy::collect`] is logged and treated as zero candidates.

pub mod api;
pub mod curated;
pub mod filler;
pub mod page;

pub use api::ApiStrategy;
pub use curated::{CURATED_KEYWORDS, CuratedStrategy};
pub use filler::SyntheticFillerStrategy;
pub use page::{EmbeddedDataStrategy, PageSource, StructuralStrategy};

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use shoptrends_core::{Candidate, Error, SNAPSHOT_SIZE};
use tokio::sync::OnceCell;

/// One self-contained method of obtaining keyword candidates.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce candidates, or fail.
    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error>;

    /// Produce candidates, absorbing failures.
    async fn attempt(&self, run: &CascadeRun) -> Vec<Candidate> {
        match self.collect(run).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(strategy = self.name(), error = %e, "strategy failed; continuing cascade");
                Vec::new()
            }
        }
    }
}

/// State of a single cascade run.
///
/// Holds the keywords accumulated so far and the page body shared by the
/// page-based strategies, so the page is fetched at most once per run.
#[derive(Debug, Default)]
pub struct CascadeRun {
    seen: HashSet<String>,
    candidates: Vec<Candidate>,
    page: OnceCell<Result<Arc<str>, Error>>,
}

impl CascadeRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= SNAPSHOT_SIZE
    }

    /// Slots left before the run is full.
    pub fn remaining(&self) -> usize {
        SNAPSHOT_SIZE.saturating_sub(self.candidates.len())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.seen.contains(keyword)
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    /// Page body from `source`, fetched on first use and reused afterwards.
    pub async fn page(&self, source: &PageSource) -> Result<Arc<str>, Error> {
        self.page.get_or_init(|| source.load()).await.clone()
    }

    /// Add new candidates in order, skipping blanks and keywords already
    /// collected, until the run is full. Returns how many were added.
    pub fn absorb(&mut self, candidates: Vec<Candidate>) -> usize {
        let before = self.candidates.len();
        for candidate in candidates {
            if self.is_full() {
                break;
            }
            let keyword = candidate.keyword.trim();
            if keyword.is_empty() || !self.seen.insert(keyword.to_string()) {
                continue;
            }
            self.candidates.push(Candidate { keyword: keyword.to_string(), ..candidate });
        }
        self.candidates.len() - before
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}
