//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol: capability negotiation, tool listing and tool invocation.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built in `domains/tools/router.rs`; adding a new tool
//! does not require modifying this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use crate::domains::tools::{MemoryStore, ToolRegistry, build_tool_router, unknown_tool_result};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and owns the
/// process-wide shared state: the read-only tool router/registry and the
/// memory store, both shared across every concurrently-served session.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared key/value store backing the memory tool. The only piece of
    /// mutable state shared between sessions.
    store: Arc<MemoryStore>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(MemoryStore::new());

        Self {
            tool_router: build_tool_router::<Self>(config.clone(), store.clone()),
            config,
            store,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration (for tool access).
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared memory store.
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as plain JSON (for HTTP transport).
    pub fn list_tools_json(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// This method uses the ToolRegistry to dispatch to the appropriate
    /// tool handler. Each tool's http_handler is defined in its own file
    /// under `domains/tools/definitions/`.
    #[cfg(feature = "http")]
    pub async fn call_tool_http(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.config.clone(), self.store.clone());
        registry.call_tool(name, arguments).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server exposes four tools: weather (city weather lookup), \
                 calculator (arithmetic expressions), urlFetch (HTTP GET/POST) \
                 and memory (process-wide key/value storage)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        // Answer from the registry rather than the router so the order is
        // always the registration order.
        Ok(ListToolsResult {
            tools: ToolRegistry::get_all_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);

        // An unknown tool name is answered in-band with an error envelope,
        // not with a protocol error; the session keeps serving.
        if !self.tool_router.has_route(request.name.as_ref()) {
            warn!("Unknown tool requested: {}", request.name);
            return Ok(unknown_tool_result(&request.name));
        }

        let ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_identity_comes_from_config() {
        let mut config = Config::default();
        config.server.name = "test-server".to_string();
        let server = McpServer::new(config);
        assert_eq!(server.name(), "test-server");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_get_info_advertises_tools_only() {
        let server = McpServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_list_tools_json_names_and_order() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools_json();
        let names: Vec<_> = tools
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["weather", "calculator", "urlFetch", "memory"]);
        for tool in &tools {
            assert!(!tool["description"].as_str().unwrap().is_empty());
        }
    }
}
