//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHOPTRENDS_*)
//! 2. Legacy credential variables (NAVER_CLIENT_ID, NAVER_CLIENT_SECRET)
//! 3. TOML config file (if SHOPTRENDS_CONFIG_FILE set)
//! 4. Built-in defaults

use std::time::Duration;

use chrono_tz::Tz;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHOPTRENDS_*)
/// 2. NAVER_CLIENT_ID / NAVER_CLIENT_SECRET
/// 3. TOML config file (if SHOPTRENDS_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shopping home page scanned by the structural and embedded-data strategies.
    ///
    /// Set via SHOPTRENDS_SOURCE_URL environment variable.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Endpoint queried by the indirect API strategy.
    ///
    /// Set via SHOPTRENDS_API_URL environment variable.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Client id for the indirect API strategy.
    ///
    /// Set via SHOPTRENDS_API_CLIENT_ID or NAVER_CLIENT_ID.
    #[serde(default)]
    pub api_client_id: Option<String>,

    /// Client secret for the indirect API strategy.
    ///
    /// Set via SHOPTRENDS_API_CLIENT_SECRET or NAVER_CLIENT_SECRET.
    #[serde(default)]
    pub api_client_secret: Option<String>,

    /// Browser-like User-Agent sent with page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SHOPTRENDS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// CSS selectors tried in order by the structural strategy.
    #[serde(default = "default_selectors")]
    pub selectors: Vec<String>,

    /// JSON keys whose array values are treated as keyword lists.
    #[serde(default = "default_json_keys")]
    pub json_keys: Vec<String>,

    /// Category label for live and curated entries.
    #[serde(default = "default_category")]
    pub category: String,

    /// Category label for synthetic filler entries.
    #[serde(default = "default_filler_category")]
    pub filler_category: String,

    /// Prefix of synthetic filler keywords, rendered as `"{prefix} {n}"`.
    #[serde(default = "default_filler_prefix")]
    pub filler_prefix: String,

    /// IANA name of the timezone used for timestamps and the daily trigger.
    ///
    /// Set via SHOPTRENDS_TIMEZONE.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Local hour of the daily refresh.
    #[serde(default = "default_refresh_hour")]
    pub refresh_hour: u32,

    /// Local minute of the daily refresh.
    #[serde(default)]
    pub refresh_minute: u32,

    /// Whether to publish a snapshot before serving requests.
    #[serde(default = "default_true")]
    pub refresh_on_start: bool,
}

fn default_source_url() -> String {
    "https://shopping.naver.com/home".into()
}

fn default_api_url() -> String {
    "https://openapi.naver.com/v1/search/shop.json".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .into()
}

fn default_accept_language() -> String {
    "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_selectors() -> Vec<String> {
    [
        r#"a[href*="search.naver"]"#,
        ".keyword",
        ".trend_keyword",
        ".popular_keyword",
        "[data-keyword]",
        ".rank_keyword",
        r#"a[class*="trend"]"#,
        r#"span[class*="trend"]"#,
        r#"a[class*="keyword"]"#,
        r#"span[class*="keyword"]"#,
        r#"a[class*="rank"]"#,
        r#"span[class*="rank"]"#,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_json_keys() -> Vec<String> {
    ["keywords", "trends", "popular", "rank"].into_iter().map(String::from).collect()
}

fn default_category() -> String {
    "쇼핑".into()
}

fn default_filler_category() -> String {
    "기타".into()
}

fn default_filler_prefix() -> String {
    "트렌드".into()
}

fn default_timezone() -> String {
    "Asia/Seoul".into()
}

fn default_refresh_hour() -> u32 {
    12
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            api_url: default_api_url(),
            api_client_id: None,
            api_client_secret: None,
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_ms: default_timeout_ms(),
            selectors: default_selectors(),
            json_keys: default_json_keys(),
            category: default_category(),
            filler_category: default_filler_category(),
            filler_prefix: default_filler_prefix(),
            timezone: default_timezone(),
            refresh_hour: default_refresh_hour(),
            refresh_minute: 0,
            refresh_on_start: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The timezone all timestamps are rendered in.
    ///
    /// Falls back to UTC for an unknown name; `validate` rejects those.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// Both API credentials, when configured.
    pub fn api_credentials(&self) -> Option<(&str, &str)> {
        match (self.api_client_id.as_deref(), self.api_client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHOPTRENDS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["NAVER_CLIENT_ID", "NAVER_CLIENT_SECRET"])
                    .map(|key| key.as_str().to_lowercase().replacen("naver_", "api_", 1).into()),
            )
            .merge(
                Env::prefixed("SHOPTRENDS_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
    }
}
