//! Single-slot snapshot store.
//!
//! The slot is guarded by a tokio `RwLock` that is only held long enough to
//! clone or swap an `Arc<Snapshot>`. Producing a snapshot happens outside the
//! lock, so a slow upstream never blocks readers of the previous generation.
//!
//! Concurrent refreshes are not coalesced: each run publishes when it
//! finishes and the last one to finish wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tokio::sync::{Mutex, RwLock};

use crate::model::Snapshot;

/// Something that can build a complete snapshot on demand.
///
/// Production cannot fail: implementations absorb upstream errors and fall
/// back to deterministic data.
#[async_trait]
pub trait SnapshotProducer: Send + Sync {
    async fn produce(&self) -> Snapshot;
}

/// Cache holding the latest published snapshot.
pub struct CacheStore {
    slot: RwLock<Option<Arc<Snapshot>>>,
    producer: Arc<dyn SnapshotProducer>,
    bootstrap: Mutex<()>,
}

impl CacheStore {
    /// Create an empty store that refreshes through `producer`.
    pub fn new(producer: Arc<dyn SnapshotProducer>) -> Self {
        Self { slot: RwLock::new(None), producer, bootstrap: Mutex::new(()) }
    }

    /// Replace the held snapshot wholesale.
    pub async fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.slot.write().await;
        *slot = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Run the producer and publish its result.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        tracing::info!("refreshing trend snapshot");
        let snapshot = self.producer.produce().await;
        let published = self.publish(snapshot).await;
        tracing::info!(
            entries = published.len(),
            updated_at = %published.updated_at.to_rfc3339(),
            "trend snapshot published"
        );
        published
    }

    /// The held snapshot, without triggering a refresh.
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().await.clone()
    }

    /// The held snapshot, bootstrapping it synchronously if none exists yet.
    ///
    /// Concurrent first reads share a single bootstrap run.
    pub async fn read(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.current().await {
            return snapshot;
        }

        let _guard = self.bootstrap.lock().await;
        if let Some(snapshot) = self.current().await {
            return snapshot;
        }

        tracing::info!("cache is empty, bootstrapping trend snapshot");
        self.refresh().await
    }

    /// Timestamp and entry count of the held snapshot.
    pub async fn metadata(&self) -> (Option<DateTime<FixedOffset>>, usize) {
        match self.current().await {
            Some(snapshot) => (Some(snapshot.updated_at), snapshot.len()),
            None => (None, 0),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Candidate, SNAPSHOT_SIZE};
    use crate::normalize::Normalizer;
    use chrono::{FixedOffset, Utc};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Producer tagging every keyword with its generation number.
    pub(crate) struct CountingProducer {
        pub(crate) runs: AtomicUsize,
        pub(crate) delay: Duration,
    }

    impl CountingProducer {
        pub(crate) fn new(delay: Duration) -> Self {
            Self { runs: AtomicUsize::new(0), delay }
        }

        pub(crate) fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotProducer for CountingProducer {
        async fn produce(&self) -> Snapshot {
            let generation = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            let candidates = (0..SNAPSHOT_SIZE).map(|i| Candidate::keyword(format!("gen{generation}-{i}")));
            let now = Utc::now().with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap());
            Normalizer::default().finalize(candidates, now)
        }
    }

    fn generation_of(snapshot: &Snapshot) -> HashSet<String> {
        snapshot
            .entries
            .iter()
            .filter_map(|e| e.keyword.split('-').next().map(String::from))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = CacheStore::new(Arc::new(CountingProducer::new(Duration::ZERO)));
        assert!(store.current().await.is_none());
        assert_eq!(store.metadata().await, (None, 0));
    }

    #[tokio::test]
    async fn test_read_bootstraps_once() {
        let producer = Arc::new(CountingProducer::new(Duration::from_millis(20)));
        let store = Arc::new(CacheStore::new(producer.clone()));

        let (a, b) = tokio::join!(store.read(), store.read());

        assert_eq!(producer.runs(), 1);
        assert_eq!(a.len(), SNAPSHOT_SIZE);
        assert!(Arc::ptr_eq(&a, &b));

        let again = store.read().await;
        assert_eq!(producer.runs(), 1);
        assert!(Arc::ptr_eq(&a, &again));
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let producer = Arc::new(CountingProducer::new(Duration::ZERO));
        let store = CacheStore::new(producer.clone());

        let first = store.refresh().await;
        let second = store.refresh().await;

        assert_eq!(producer.runs(), 2);
        assert_eq!(first.entries[0].keyword, "gen1-0");
        assert_eq!(second.entries[0].keyword, "gen2-0");
        let current = store.current().await.unwrap();
        assert!(Arc::ptr_eq(&current, &second));

        let (last_update, count) = store.metadata().await;
        assert_eq!(last_update, Some(second.updated_at));
        assert_eq!(count, SNAPSHOT_SIZE);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_publishes_whole_generations() {
        let producer = Arc::new(CountingProducer::new(Duration::from_millis(10)));
        let store = Arc::new(CacheStore::new(producer.clone()));

        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.refresh().await }));
        }
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.read().await }));
        }

        for handle in handles {
            let snapshot = handle.await.unwrap();
            assert_eq!(snapshot.len(), SNAPSHOT_SIZE);
            assert_eq!(generation_of(&snapshot).len(), 1);
            let ranks: Vec<u32> = snapshot.entries.iter().map(|e| e.rank).collect();
            assert_eq!(ranks, (1..=SNAPSHOT_SIZE as u32).collect::<Vec<_>>());
        }

        let current = store.current().await.unwrap();
        assert_eq!(current.len(), SNAPSHOT_SIZE);
        assert_eq!(generation_of(&current).len(), 1);
    }

    #[tokio::test]
    async fn test_reads_served_while_refresh_in_flight() {
        let producer = Arc::new(CountingProducer::new(Duration::from_millis(200)));
        let store = Arc::new(CacheStore::new(producer.clone()));
        let first = store.refresh().await;

        let refreshing = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let during = tokio::time::timeout(Duration::from_millis(50), store.read())
            .await
            .expect("read must not wait on the producer");
        assert!(Arc::ptr_eq(&first, &during));

        let second = refreshing.await.unwrap();
        assert!(Arc::ptr_eq(&second, &store.read().await));
    }
}
