//! Common utilities shared across tool definitions.

use rmcp::model::{CallToolResult, Content};
use tracing::warn;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// In-band error envelope for a tool name with no registered handler.
///
/// Unknown tools are a caller mistake, not a session fault, so the result is
/// an error envelope rather than a protocol error.
pub fn unknown_tool_result(name: &str) -> CallToolResult {
    error_result(&format!("unknown tool: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_error_result_sets_is_error() {
        let result = error_result("something failed");
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "something failed");
    }

    #[test]
    fn test_success_result_is_not_error() {
        let result = success_result("done".to_string());
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "done");
    }

    #[test]
    fn test_unknown_tool_result_names_the_tool() {
        let result = unknown_tool_result("doesNotExist");
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "unknown tool: doesNotExist");
    }
}
