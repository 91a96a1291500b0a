//! trends_health tool implementation.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shoptrends_core::TrendService;

use super::{json_result, now};

/// Output from the trends_health tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendsHealthOutput {
    /// Always "healthy" when the server answers.
    pub status: String,
    pub scheduler_running: bool,
    /// Absent until the first snapshot is published.
    pub last_update: Option<DateTime<FixedOffset>>,
    /// Next daily refresh, absent when no scheduler is attached.
    pub next_update: Option<DateTime<FixedOffset>>,
    pub cache_count: usize,
    pub timestamp: DateTime<FixedOffset>,
}

/// Implementation of the trends_health tool.
///
/// Reports cache state without triggering a bootstrap.
pub async fn health_impl(service: &TrendService, timezone: Tz) -> Result<CallToolResult, McpError> {
    let metadata = service.health().await;

    let output = TrendsHealthOutput {
        status: "healthy".into(),
        scheduler_running: metadata.scheduler_running,
        last_update: metadata.last_update_time,
        next_update: metadata.next_update,
        cache_count: metadata.entry_count,
        timestamp: now(timezone),
    };
    json_result(&output)
}
