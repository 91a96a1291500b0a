//! Indirect API strategy.
//!
//! Calls a shopping search endpoint with client credentials and pulls keyword
//! strings out of the JSON response with the same key scan used for embedded
//! page data. The endpoint's schema is not assumed beyond that.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shoptrends_core::{Candidate, Error, SNAPSHOT_SIZE};

use super::{CascadeRun, Strategy};
use crate::extract::keywords_from_json;
use crate::fetch::PageFetcher;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

#[derive(Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Tertiary strategy: a credentialed JSON endpoint.
pub struct ApiStrategy {
    fetcher: Arc<dyn PageFetcher>,
    url: String,
    credentials: Option<Credentials>,
    json_keys: Vec<String>,
    category: String,
}

impl ApiStrategy {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>, url: impl Into<String>, json_keys: Vec<String>, category: impl Into<String>,
    ) -> Self {
        Self { fetcher, url: url.into(), credentials: None, json_keys, category: category.into() }
    }

    pub fn with_credentials(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials { client_id: client_id.into(), client_secret: client_secret.into() });
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl Strategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "indirect_api"
    }

    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error> {
        let Some(credentials) = &self.credentials else {
            tracing::debug!("no API credentials configured; skipping");
            return Ok(Vec::new());
        };

        let headers = [
            (CLIENT_ID_HEADER, credentials.client_id.as_str()),
            (CLIENT_SECRET_HEADER, credentials.client_secret.as_str()),
        ];
        let body = self.fetcher.get_text(&self.url, &headers).await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| Error::Parse(format!("API response from {}: {}", self.url, e)))?;

        let keywords = keywords_from_json(&value, &self.json_keys, SNAPSHOT_SIZE);
        tracing::debug!(url = %self.url, found = keywords.len(), "API extraction finished");

        Ok(keywords
            .into_iter()
            .filter(|keyword| !run.contains(keyword))
            .map(|keyword| Candidate::keyword(keyword).with_category(&self.category))
            .collect())
    }
}
