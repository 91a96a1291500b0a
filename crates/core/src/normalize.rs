//! Snapshot normalization.
//!
//! Turns the candidates accumulated by a cascade run into exactly
//! [`SNAPSHOT_SIZE`] ranked entries:
//!
//! - keywords are trimmed, and blank ones are dropped
//! - duplicates are removed by exact, case-sensitive keyword match, first wins
//! - ranks are assigned 1..=100 in accumulation order
//! - missing search counts follow `10000 - 50 * index` (floored at 1000), and
//!   every count is clamped to the previous rank's so counts never increase
//! - short results are padded with synthetic filler entries
//!
//! Normalization never fails.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use crate::config::AppConfig;
use crate::model::{Candidate, SNAPSHOT_SIZE, Snapshot, TrendChange, TrendEntry};

/// Search count assigned to rank 1 when the source supplies none.
pub const BASELINE_SEARCH_COUNT: u64 = 10_000;

/// Decrement per rank for synthetic search counts.
pub const SEARCH_COUNT_STEP: u64 = 50;

/// Lowest synthetic search count.
pub const MIN_SEARCH_COUNT: u64 = 1_000;

/// Synthetic search count for a zero-based position.
pub fn synthetic_search_count(index: usize) -> u64 {
    BASELINE_SEARCH_COUNT
        .saturating_sub(index as u64 * SEARCH_COUNT_STEP)
        .max(MIN_SEARCH_COUNT)
}

/// Trim a scraped keyword, returning it only if it is longer than one character.
pub fn clean_keyword(raw: &str) -> Option<&str> {
    let keyword = raw.trim();
    if keyword.chars().count() > 1 { Some(keyword) } else { None }
}

/// Snapshot normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    category: String,
    filler_category: String,
    filler_prefix: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Normalizer {
    pub fn new(
        category: impl Into<String>, filler_category: impl Into<String>, filler_prefix: impl Into<String>,
    ) -> Self {
        Self { category: category.into(), filler_category: filler_category.into(), filler_prefix: filler_prefix.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.category, &config.filler_category, &config.filler_prefix)
    }

    /// Default category for live and curated entries.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Generate `count` synthetic placeholder candidates.
    ///
    /// Placeholders are numbered from `collected + 1`; numbers whose keyword
    /// is already in `seen` are skipped.
    pub fn filler(&self, seen: &HashSet<String>, collected: usize, count: usize) -> Vec<Candidate> {
        (collected + 1..)
            .map(|n| format!("{} {}", self.filler_prefix, n))
            .filter(|keyword| !seen.contains(keyword))
            .take(count)
            .map(|keyword| Candidate::keyword(keyword).with_category(&self.filler_category))
            .collect()
    }

    /// Build the published snapshot from accumulated candidates.
    pub fn finalize<I>(&self, candidates: I, updated_at: DateTime<FixedOffset>) -> Snapshot
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut seen = HashSet::with_capacity(SNAPSHOT_SIZE);
        let mut kept = Vec::with_capacity(SNAPSHOT_SIZE);

        for candidate in candidates {
            if kept.len() == SNAPSHOT_SIZE {
                break;
            }
            let keyword = candidate.keyword.trim();
            if keyword.is_empty() || !seen.insert(keyword.to_string()) {
                continue;
            }
            kept.push(Candidate { keyword: keyword.to_string(), ..candidate });
        }

        if kept.len() < SNAPSHOT_SIZE {
            tracing::debug!(collected = kept.len(), "padding snapshot with synthetic entries");
            let padding = self.filler(&seen, kept.len(), SNAPSHOT_SIZE - kept.len());
            kept.extend(padding);
        }

        let mut ceiling = u64::MAX;
        let entries = kept
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let search_count = candidate
                    .search_count
                    .unwrap_or_else(|| synthetic_search_count(index))
                    .min(ceiling);
                ceiling = search_count;

                TrendEntry {
                    rank: index as u32 + 1,
                    keyword: candidate.keyword,
                    search_count,
                    trend_change: candidate.trend_change,
                    category: candidate.category.unwrap_or_else(|| self.category.clone()),
                    updated_at,
                }
            })
            .collect();

        Snapshot { entries, updated_at }
    }
}
