//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the trend service.
use std::sync::Arc;

use chrono_tz::Tz;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shoptrends_core::TrendService;

use crate::tools::{TrendsTopParams, health_impl, list_impl, refresh_impl, top_impl};

/// The main MCP server handler for shoptrends.
#[derive(Clone)]
pub struct TrendsServer {
    service: Arc<TrendService>,
    timezone: Tz,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TrendsServer {
    pub fn new(service: Arc<TrendService>, timezone: Tz) -> Self {
        Self { service, timezone, tool_router: Self::tool_router() }
    }

    #[tool(description = "List all 100 trending shopping keywords, ranked, with the snapshot's generation time.")]
    async fn trends_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(&self.service, self.timezone).await
    }

    #[tool(description = "Return the top `limit` trending shopping keywords (limit between 1 and 100).")]
    async fn trends_top(&self, params: Parameters<TrendsTopParams>) -> Result<CallToolResult, McpError> {
        top_impl(&self.service, self.timezone, params.0).await
    }

    /// Runs a full cascade before answering, so it can take several seconds.
    #[tool(description = "Re-collect trending keywords now and publish the new snapshot.")]
    async fn trends_refresh(&self) -> Result<CallToolResult, McpError> {
        refresh_impl(&self.service, self.timezone).await
    }

    #[tool(description = "Report cache size, last and next update times, and scheduler liveness.")]
    async fn trends_health(&self) -> Result<CallToolResult, McpError> {
        health_impl(&self.service, self.timezone).await
    }
}

impl ServerHandler for TrendsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shoptrends".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Daily top-100 trending shopping keywords, served from an in-memory snapshot.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
