//! Read/refresh facade consumed by the request layer.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::error::Error;
use crate::model::{CacheMetadata, Snapshot};
use crate::scheduler::SchedulerHandle;

/// The operations exposed to external consumers.
pub struct TrendService {
    store: Arc<CacheStore>,
    scheduler: Option<SchedulerHandle>,
}

impl TrendService {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store, scheduler: None }
    }

    /// Attach the daily scheduler so health reports its liveness.
    pub fn with_scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// The full current snapshot.
    pub async fn get_all(&self) -> Arc<Snapshot> {
        self.store.read().await
    }

    /// The first `limit` entries of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` unless `1 <= limit <= 100`.
    pub async fn get_top(&self, limit: i64) -> Result<Snapshot, Error> {
        let limit = Error::check_limit(limit)?;
        Ok(self.store.read().await.prefix(limit))
    }

    /// Run one cascade and publish it. Never fails.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        self.store.refresh().await
    }

    pub async fn health(&self) -> CacheMetadata {
        let (last_update_time, entry_count) = self.store.metadata().await;
        CacheMetadata {
            last_update_time,
            entry_count,
            scheduler_running: self.scheduler.as_ref().is_some_and(SchedulerHandle::is_running),
            next_update: self.scheduler.as_ref().map(SchedulerHandle::next_update),
        }
    }

    pub fn scheduler(&self) -> Option<&SchedulerHandle> {
        self.scheduler.as_ref()
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}
