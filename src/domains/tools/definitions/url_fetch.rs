//! URL fetch tool definition.
//!
//! Performs an HTTP GET or POST against an arbitrary URL and reports the
//! status line plus the first 1000 characters of the response body.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::common::error_result;
use crate::domains::tools::ToolError;

/// Maximum number of body characters echoed back to the caller.
const BODY_PREVIEW_CHARS: usize = 1000;

// ============================================================================
// Tool Parameters
// ============================================================================

/// HTTP methods the tool supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Parameters for the urlFetch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UrlFetchParams {
    /// The URL to fetch.
    #[schemars(description = "URL to fetch")]
    pub url: String,

    /// HTTP method to use (default: GET).
    #[schemars(description = "HTTP method: GET or POST (default: GET)")]
    #[serde(default)]
    pub method: HttpMethod,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Metadata of a completed fetch.
#[derive(Debug, Serialize, JsonSchema)]
struct FetchResult {
    url: String,
    status: u16,
    status_text: String,
    /// Whether the body preview was cut off at the character limit.
    truncated: bool,
}

/// Truncate a body to its first `limit` characters.
///
/// Returns the preview and whether anything was cut off. Counting is by
/// character, not byte, so multi-byte text is never split mid-character.
fn truncate_body(body: &str, limit: usize) -> (&str, bool) {
    match body.char_indices().nth(limit) {
        Some((offset, _)) => (&body[..offset], true),
        None => (body, false),
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// URL fetch tool - HTTP GET/POST with a body preview.
pub struct UrlFetchTool;

impl UrlFetchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "urlFetch";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch a URL with HTTP GET or POST. Returns the status code, status text and the first 1000 characters of the response body.";

    /// Execute the tool logic.
    pub async fn execute(params: &UrlFetchParams) -> CallToolResult {
        info!(
            "urlFetch tool called: {} {}",
            params.method.as_str(),
            params.url
        );

        match Self::fetch(params).await {
            Ok(result) => result,
            Err(e) => error_result(&e.to_string()),
        }
    }

    async fn fetch(params: &UrlFetchParams) -> Result<CallToolResult, ToolError> {
        let client = reqwest::Client::new();
        let request = match params.method {
            HttpMethod::Get => client.get(&params.url),
            HttpMethod::Post => client.post(&params.url),
        };

        let response = request.send().await.map_err(|e| {
            error!("urlFetch request failed: {}", e);
            ToolError::upstream(format!("URL fetch failed: {}", e))
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        let body = response.text().await.map_err(|e| {
            error!("urlFetch body read failed: {}", e);
            ToolError::upstream(format!("failed to read response body: {}", e))
        })?;

        let (preview, truncated) = truncate_body(&body, BODY_PREVIEW_CHARS);
        let marker = if truncated { "..." } else { "" };

        let summary = format!(
            "URL: {}\nStatus: {} {}\nBody: {}{}",
            params.url,
            status.as_u16(),
            status_text,
            preview,
            marker
        );

        let result = FetchResult {
            url: params.url.clone(),
            status: status.as_u16(),
            status_text,
            truncated,
        };

        Ok(CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(serde_json::to_value(&result).unwrap()),
            is_error: Some(false),
            meta: None,
        })
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, String> {
        let url = arguments
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'url' parameter".to_string())?
            .to_string();

        let method = match arguments.get("method") {
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|_| "Invalid 'method' parameter: expected GET or POST".to_string())?,
            None => HttpMethod::default(),
        };

        let params = UrlFetchParams { url, method };
        let result = Self::execute(&params).await;

        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UrlFetchParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: UrlFetchParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
