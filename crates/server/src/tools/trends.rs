//! trends_list and trends_top tool implementations.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shoptrends_core::{Snapshot, TrendEntry, TrendService};

use super::{json_result, now};

/// Parameters for the trends_top tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendsTopParams {
    /// Number of leading entries to return, between 1 and 100.
    pub limit: i64,
}

/// Output from the trends_list and trends_top tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendsListOutput {
    /// Ranked entries, rank 1 first.
    pub data: Vec<TrendEntry>,
    /// Number of entries in `data`.
    pub count: usize,
    /// When the served snapshot was generated.
    pub last_update: DateTime<FixedOffset>,
    /// When this response was produced.
    pub timestamp: DateTime<FixedOffset>,
}

impl TrendsListOutput {
    fn new(snapshot: &Snapshot, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            data: snapshot.entries.clone(),
            count: snapshot.len(),
            last_update: snapshot.updated_at,
            timestamp,
        }
    }
}

/// Implementation of the trends_list tool.
pub async fn list_impl(service: &TrendService, timezone: Tz) -> Result<CallToolResult, McpError> {
    let snapshot = service.get_all().await;
    tracing::debug!(count = snapshot.len(), "serving full snapshot");
    json_result(&TrendsListOutput::new(&snapshot, now(timezone)))
}

/// Implementation of the trends_top tool.
pub async fn top_impl(
    service: &TrendService, timezone: Tz, params: TrendsTopParams,
) -> Result<CallToolResult, McpError> {
    let snapshot = service.get_top(params.limit).await?;
    tracing::debug!(limit = params.limit, "serving snapshot prefix");
    json_result(&TrendsListOutput::new(&snapshot, now(timezone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tests::{parse_output, seoul, service};
    use rmcp::model::ErrorCode;

    #[tokio::test]
    async fn test_list_bootstraps_once() {
        let (producer, service) = service();

        let first: TrendsListOutput = parse_output(&list_impl(&service, seoul()).await.unwrap());
        let second: TrendsListOutput = parse_output(&list_impl(&service, seoul()).await.unwrap());

        assert_eq!(first.count, 100);
        assert_eq!(first.data.len(), 100);
        assert_eq!(first.data[0].rank, 1);
        assert_eq!(first.data[0].keyword, "트렌드 1");
        assert_eq!(first.last_update, second.last_update);
        assert_eq!(producer.runs(), 1);
    }

    #[tokio::test]
    async fn test_list_wire_shape() {
        let (_, service) = service();
        let result = list_impl(&service, seoul()).await.unwrap();

        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val.get("text").and_then(|v| v.as_str()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text).unwrap();

        let entry = &value["data"][0];
        for field in ["rank", "keyword", "search_count", "trend_change", "category", "updated_at"] {
            assert!(entry.get(field).is_some(), "missing {field}");
        }
        assert_eq!(entry["trend_change"], "stable");
        assert!(value["timestamp"].as_str().unwrap().ends_with("+09:00"));
        assert!(value["last_update"].as_str().unwrap().ends_with("+09:00"));
    }

    #[tokio::test]
    async fn test_top_returns_prefix() {
        let (_, service) = service();

        let output: TrendsListOutput =
            parse_output(&top_impl(&service, seoul(), TrendsTopParams { limit: 5 }).await.unwrap());
        assert_eq!(output.count, 5);
        let ranks: Vec<u32> = output.data.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_top_out_of_range_is_invalid_params() {
        let (_, service) = service();

        for limit in [0, 101, -3] {
            let err = top_impl(&service, seoul(), TrendsTopParams { limit }).await.unwrap_err();
            assert_eq!(err.code, ErrorCode(-32602));
            assert!(err.message.starts_with("INVALID_RANGE"));
        }
    }
}
