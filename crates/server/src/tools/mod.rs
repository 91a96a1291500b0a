//! MCP tool implementations.
//!
//! This module contains all tools exposed by the shoptrends server.

pub mod health;
pub mod refresh;
pub mod trends;

pub use health::health_impl;
pub use refresh::refresh_impl;
pub use trends::{TrendsTopParams, list_impl, top_impl};

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Current time in the service timezone.
pub(crate) fn now(timezone: Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&timezone).fixed_offset()
}

/// Wrap a tool output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
