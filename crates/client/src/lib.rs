//! Client code for shoptrends.
//!
//! This crate provides the HTTP fetch layer, keyword extraction, and the
//! strategy cascade that produces trend snapshots for the server.

pub mod cascade;
pub mod extract;
pub mod fetch;
pub mod strategy;

pub use cascade::{Cascade, Contribution};
pub use extract::{KeywordSelectors, extract_embedded_keywords, extract_keywords, keywords_from_json};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageFetcher};
pub use strategy::{CascadeRun, Strategy};
