//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    cache_purge::{CachePurgeParams, purge_impl},
    verified_search::{VerifiedSearchParams, search_impl},
};

use rechtsbron_client::VerifiedSearch;
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

const INSTRUCTIONS: &str = "Answers legal questions from a fixed set of verified Dutch government and court sources. \
     Call verified_search and base the answer only on the returned evidence. Sources from previous years are \
     withheld unless the question asks about the past.";

/// The main MCP server handler for rechtsbron.
#[derive(Clone)]
pub struct RechtsbronServer {
    pipeline: VerifiedSearch,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl RechtsbronServer {
    /// Create a new server handler over a configured pipeline.
    pub fn new(pipeline: VerifiedSearch) -> Self {
        Self { pipeline, tool_router: Self::tool_router() }
    }

    /// Search the verified legal sources.
    ///
    /// Fans out over every configured domain, keeps current-year results (or all of them for
    /// questions about the past) and returns a numbered evidence bundle with instructions.
    #[tool(
        description = "Search verified Dutch legal sources (legislation, case law, disciplinary rulings, fines, \
                       government information, municipal regulations). Returns current-year evidence with links \
                       and freshness verdicts, plus result counts."
    )]
    async fn verified_search(&self, params: Parameters<VerifiedSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.pipeline, params.0).await
    }

    /// Purge the search result cache.
    #[tool(description = "Purge cached search results. Drops expired entries, or every entry when all is true.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.pipeline.cache(), params.0).await
    }
}

impl ServerHandler for RechtsbronServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "rechtsbron".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.into()),
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
