//! Memory tool definition.
//!
//! Process-wide key/value storage shared by every session. Supports the
//! canonical action set save/get/list/delete on all transports; delete is
//! idempotent and reports whether the key existed.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::common::{error_result, success_result};
use crate::domains::tools::MemoryStore;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the memory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MemoryParams {
    /// The action to perform.
    #[schemars(description = "Action to perform: save, get, list or delete")]
    pub action: String,

    /// The key to operate on (required for save, get and delete).
    #[schemars(description = "Key to operate on")]
    pub key: Option<String>,

    /// The value to store (required for save).
    #[schemars(description = "Value to store (save only)")]
    pub value: Option<String>,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of a delete action.
#[derive(Debug, Serialize, JsonSchema)]
struct DeleteOutcome {
    key: String,
    /// Whether a value existed before removal.
    existed: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Memory tool - shared key/value storage.
pub struct MemoryTool;

impl MemoryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "memory";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Store and retrieve key/value data shared across all sessions for the server's lifetime. Actions: save (key+value), get (key), list, delete (key).";

    /// Execute the tool logic.
    pub fn execute(params: &MemoryParams, store: &MemoryStore) -> CallToolResult {
        info!("Memory tool called: action '{}'", params.action);

        match params.action.as_str() {
            "save" => Self::save(params, store),
            "get" => Self::get(params, store),
            "list" => Self::list(store),
            "delete" => Self::delete(params, store),
            other => error_result(&format!("invalid action: {}", other)),
        }
    }

    fn save(params: &MemoryParams, store: &MemoryStore) -> CallToolResult {
        let (key, value) = match (&params.key, &params.value) {
            (Some(key), Some(value)) => (key, value),
            _ => return error_result("save requires both key and value"),
        };
        store.save(key.clone(), value.clone());
        success_result(format!("Saved: {} = {}", key, value))
    }

    fn get(params: &MemoryParams, store: &MemoryStore) -> CallToolResult {
        let key = match &params.key {
            Some(key) => key,
            None => return error_result("get requires a key"),
        };
        match store.get(key) {
            Some(value) => success_result(format!("Retrieved: {} = {}", key, value)),
            None => error_result(&format!("no value found for key: {}", key)),
        }
    }

    fn list(store: &MemoryStore) -> CallToolResult {
        let keys = store.keys();
        success_result(format!(
            "Stored keys: {} (count: {})",
            keys.join(", "),
            keys.len()
        ))
    }

    fn delete(params: &MemoryParams, store: &MemoryStore) -> CallToolResult {
        let key = match &params.key {
            Some(key) => key,
            None => return error_result("delete requires a key"),
        };
        let existed = store.delete(key);
        let summary = if existed {
            format!("Deleted: {}", key)
        } else {
            format!("No value found for key: {}", key)
        };
        let outcome = DeleteOutcome {
            key: key.clone(),
            existed,
        };
        CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(serde_json::to_value(&outcome).unwrap()),
            is_error: Some(false),
            meta: None,
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        store: Arc<MemoryStore>,
    ) -> Result<serde_json::Value, String> {
        let action = arguments
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'action' parameter".to_string())?
            .to_string();

        let key = arguments
            .get("key")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let value = arguments
            .get("value")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let params = MemoryParams { action, key, value };
        let result = Self::execute(&params, &store);

        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MemoryParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(store: Arc<MemoryStore>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let store = store.clone();
            async move {
                let params: MemoryParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &store))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn params(action: &str, key: Option<&str>, value: Option<&str>) -> MemoryParams {
        MemoryParams {
            action: action.to_string(),
            key: key.map(|s| s.to_string()),
            value: value.map(|s| s.to_string()),
        }
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_save_then_get() {
        let store = MemoryStore::new();
        let result = MemoryTool::execute(&params("save", Some("x"), Some("1")), &store);
        assert!(!result.is_error.unwrap_or(false));

        let result = MemoryTool::execute(&params("get", Some("x"), None), &store);
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "Retrieved: x = 1");
    }

    #[test]
    fn test_get_missing_key_is_error() {
        let store = MemoryStore::new();
        let result = MemoryTool::execute(&params("get", Some("missing-key"), None), &store);
        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("missing-key"));
    }

    #[test]
    fn test_save_requires_key_and_value() {
        let store = MemoryStore::new();
        let result = MemoryTool::execute(&params("save", Some("x"), None), &store);
        assert!(result.is_error.unwrap_or(false));

        let result = MemoryTool::execute(&params("save", None, Some("1")), &store);
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_save_overwrites_existing_value() {
        let store = MemoryStore::new();
        MemoryTool::execute(&params("save", Some("x"), Some("1")), &store);
        MemoryTool::execute(&params("save", Some("x"), Some("2")), &store);
        let result = MemoryTool::execute(&params("get", Some("x"), None), &store);
        assert_eq!(text_of(&result), "Retrieved: x = 2");
    }

    #[test]
    fn test_list_reports_count() {
        let store = MemoryStore::new();
        MemoryTool::execute(&params("save", Some("a"), Some("1")), &store);
        MemoryTool::execute(&params("save", Some("b"), Some("2")), &store);
        let result = MemoryTool::execute(&params("list", None, None), &store);
        assert!(!result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("(count: 2)"));
    }

    #[test]
    fn test_delete_is_idempotent_and_reports_existence() {
        let store = MemoryStore::new();
        MemoryTool::execute(&params("save", Some("x"), Some("1")), &store);

        let first = MemoryTool::execute(&params("delete", Some("x"), None), &store);
        assert!(!first.is_error.unwrap_or(false));
        assert_eq!(first.structured_content.unwrap()["existed"], true);

        let second = MemoryTool::execute(&params("delete", Some("x"), None), &store);
        assert!(!second.is_error.unwrap_or(false));
        assert_eq!(second.structured_content.unwrap()["existed"], false);
    }

    #[test]
    fn test_invalid_action() {
        let store = MemoryStore::new();
        let result = MemoryTool::execute(&params("purge", None, None), &store);
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "invalid action: purge");
    }
}
