//! HTTP fetch pipeline for trend sources.
//!
//! ### Request Signature
//! - Browser-like `User-Agent`, `Accept` and `Accept-Language` headers
//! - Extra per-request headers (API credentials) layered on top
//!
//! ### Limits
//! - Timeout: 10s per attempt (configurable)
//! - Max redirects: 5
//! - Max body bytes: 5MB
//!
//! No retries: each call is a single attempt.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use shoptrends_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl FetchConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            max_bytes: 5 * 1024 * 1024,
            timeout: config.timeout(),
            max_redirects: 5,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Source of page and API bodies for extraction strategies.
///
/// Implemented by [`FetchClient`]; tests substitute canned responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` with additional headers, returning the body as text.
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, Error>;
}

/// HTTP fetch client with a browser-like request signature.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    pub async fn fetch(&self, url_str: &str, extra_headers: &[(&str, &str)]) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = Url::parse(url_str.trim()).map_err(|e| Error::InvalidInput(format!("invalid URL {url_str}: {e}")))?;

        let mut request = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{url} after {:?}", self.config.timeout))
            } else {
                Error::Network(format!("network error: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} from {}", status.as_u16(), url)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Network(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{url} body after {:?}", self.config.timeout))
            } else {
                Error::Network(format!("failed to read response: {}", e))
            }
        })?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::Network(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        Ok(FetchResponse { final_url, status, content_type, bytes, fetch_ms })
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, Error> {
        let response = self.fetch(url, headers).await?;
        tracing::debug!(
            url,
            final_url = %response.final_url,
            status = response.status.as_u16(),
            content_type = response.content_type.as_deref().unwrap_or("-"),
            bytes = response.bytes.len(),
            fetch_ms = response.fetch_ms,
            "fetched"
        );
        Ok(response.text())
    }
}
