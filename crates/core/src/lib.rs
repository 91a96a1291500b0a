//! Core types and shared functionality for shoptrends.
//!
//! This crate provides:
//! - Trend data model and the snapshot normalizer
//! - Single-slot snapshot cache with lazy bootstrap
//! - Daily refresh scheduler
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod scheduler;
pub mod service;

pub use cache::{CacheStore, SnapshotProducer};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{CacheMetadata, Candidate, SNAPSHOT_SIZE, Snapshot, TrendChange, TrendEntry};
pub use normalize::Normalizer;
pub use scheduler::{DailyTrigger, RefreshScheduler, SchedulerHandle};
pub use service::TrendService;
