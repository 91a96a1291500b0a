//! In-memory snapshot cache.
//!
//! Holds exactly one published [`Snapshot`](crate::Snapshot) at a time. It
//! supports:
//!
//! - Atomic replace on refresh (readers never see a torn snapshot)
//! - Lock-free production: the cascade runs without holding the cache lock
//! - Lazy bootstrap on first read

pub mod store;

pub use store::{CacheStore, SnapshotProducer};
