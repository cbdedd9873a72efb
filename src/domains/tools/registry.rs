//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, in a stable registration order
//! - HTTP dispatch for tool calls (when the http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;
use crate::domains::tools::MemoryStore;
#[cfg(feature = "http")]
use crate::domains::tools::unknown_tool_result;

use super::definitions::{CalculatorTool, MemoryTool, UrlFetchTool, WeatherTool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Registration happens once at startup; the registry is read-only
/// thereafter, which is what makes it safe to share across concurrently
/// served sessions without locking.
pub struct ToolRegistry {
    config: Arc<Config>,
    store: Arc<MemoryStore>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>, store: Arc<MemoryStore>) -> Self {
        Self { config, store }
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            WeatherTool::NAME,
            CalculatorTool::NAME,
            UrlFetchTool::NAME,
            MemoryTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools and their
    /// listing order. Every transport answers tool listings from here.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            WeatherTool::to_tool(),
            CalculatorTool::to_tool(),
            UrlFetchTool::to_tool(),
            MemoryTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        match name {
            WeatherTool::NAME => WeatherTool::http_handler(arguments, self.config.clone()).await,
            CalculatorTool::NAME => CalculatorTool::http_handler(arguments),
            UrlFetchTool::NAME => UrlFetchTool::http_handler(arguments).await,
            MemoryTool::NAME => MemoryTool::http_handler(arguments, self.store.clone()),
            // An unknown tool is answered in-band, same as on the other
            // transports; Err is reserved for malformed requests.
            _ => {
                warn!("Unknown tool requested: {}", name);
                serde_json::to_value(unknown_tool_result(name)).map_err(|e| e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(Config::default()), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        assert_eq!(names, vec!["weather", "calculator", "urlFetch", "memory"]);
    }

    #[test]
    fn test_get_all_tools_order_matches_names() {
        let registry = test_registry();
        let tools = ToolRegistry::get_all_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, registry.tool_names());
    }

    #[test]
    fn test_all_tools_have_descriptions() {
        for tool in ToolRegistry::get_all_tools() {
            assert!(!tool.name.is_empty());
            assert!(!tool.description.as_deref().unwrap_or("").is_empty());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_calculator() {
        let registry = test_registry();
        let result = registry
            .call_tool("calculator", serde_json::json!({ "expression": "5+3" }))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_memory_roundtrip() {
        let registry = test_registry();
        registry
            .call_tool(
                "memory",
                serde_json::json!({ "action": "save", "key": "x", "value": "1" }),
            )
            .await
            .unwrap();
        let result = registry
            .call_tool("memory", serde_json::json!({ "action": "get", "key": "x" }))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown_is_error_envelope() {
        let registry = test_registry();
        let result = registry
            .call_tool("doesNotExist", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "unknown tool: doesNotExist");
    }
}
