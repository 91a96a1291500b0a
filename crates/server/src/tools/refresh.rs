//! trends_refresh tool implementation.
//!
//! Runs one cascade synchronously and publishes the result.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shoptrends_core::TrendService;

use super::{json_result, now};

/// Output from the trends_refresh tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendsRefreshOutput {
    pub message: String,
    /// Generation time of the snapshot just published.
    pub last_update: DateTime<FixedOffset>,
    pub timestamp: DateTime<FixedOffset>,
}

/// Implementation of the trends_refresh tool.
pub async fn refresh_impl(service: &TrendService, timezone: Tz) -> Result<CallToolResult, McpError> {
    tracing::info!("manual refresh requested");
    let snapshot = service.refresh().await;

    let output = TrendsRefreshOutput {
        message: format!("Refreshed {} trend entries", snapshot.len()),
        last_update: snapshot.updated_at,
        timestamp: now(timezone),
    };
    json_result(&output)
}
