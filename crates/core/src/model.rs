//! Trend data model.
//!
//! A [`Snapshot`] is the published unit: exactly [`SNAPSHOT_SIZE`] ranked
//! [`TrendEntry`] values sharing one `updated_at`. Strategies never build
//! entries directly; they emit [`Candidate`] values which the normalizer
//! turns into a snapshot.

use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of entries in every published snapshot.
pub const SNAPSHOT_SIZE: usize = 100;

/// Direction of a keyword's movement since the previous ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendChange {
    Up,
    Down,
    #[default]
    Stable,
    New,
}

/// One ranked keyword observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TrendEntry {
    /// Position in the snapshot, 1-based and contiguous.
    pub rank: u32,
    pub keyword: String,
    /// Non-increasing as rank increases.
    pub search_count: u64,
    pub trend_change: TrendChange,
    pub category: String,
    /// Capture time of the cascade run that produced this entry.
    pub updated_at: DateTime<FixedOffset>,
}

/// A keyword proposed by an extraction strategy, before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub keyword: String,
    /// Count reported by the source, if it reports one.
    pub search_count: Option<u64>,
    pub trend_change: TrendChange,
    /// Category label; the normalizer falls back to its default when absent.
    pub category: Option<String>,
}

impl Candidate {
    /// A bare keyword with no source-supplied count or category.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), search_count: None, trend_change: TrendChange::Stable, category: None }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search_count(mut self, count: u64) -> Self {
        self.search_count = Some(count);
        self
    }
}

/// An immutable, complete ranked result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    pub entries: Vec<TrendEntry>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the first `limit` entries, keeping the generation timestamp.
    pub fn prefix(&self, limit: usize) -> Snapshot {
        let end = limit.min(self.entries.len());
        Snapshot { entries: self.entries[..end].to_vec(), updated_at: self.updated_at }
    }
}

/// Cache status used by health queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheMetadata {
    pub last_update_time: Option<DateTime<FixedOffset>>,
    pub entry_count: usize,
    pub scheduler_running: bool,
    pub next_update: Option<DateTime<FixedOffset>>,
}
