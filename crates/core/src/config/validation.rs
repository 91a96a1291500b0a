//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use chrono_tz::Tz;

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(field, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, format!("unsupported scheme: {other}"))),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// Selector syntax is checked where selectors are compiled, in the
    /// client crate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `refresh_hour`/`refresh_minute` is not a valid wall-clock time
    /// - `timezone` is not a known IANA timezone name
    /// - `user_agent` is empty or `selectors` is empty
    /// - `source_url`/`api_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.refresh_hour > 23 {
            return Err(invalid("refresh_hour", "must be between 0 and 23"));
        }
        if self.refresh_minute > 59 {
            return Err(invalid("refresh_minute", "must be between 0 and 59"));
        }

        self.timezone
            .parse::<Tz>()
            .map_err(|e| invalid("timezone", e.to_string()))?;

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.selectors.is_empty() {
            return Err(invalid("selectors", "at least one selector is required"));
        }

        check_http_url("source_url", &self.source_url)?;
        check_http_url("api_url", &self.api_url)?;

        if self.api_credentials().is_none() {
            tracing::debug!("API credentials not configured; indirect API strategy will be skipped");
        }

        Ok(())
    }
}
