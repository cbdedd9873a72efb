//! Tool-specific error types.
//!
//! Fallible steps inside a tool (parsing an expression, calling an
//! upstream API) return `ToolError`; the tool's `execute()` turns it into
//! an in-band error envelope. Display is the envelope text verbatim.

use thiserror::Error;

/// Errors produced while running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input could not be parsed or failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// The requested resource does not exist upstream.
    #[error("{0}")]
    NotFound(String),

    /// A call to an upstream service failed.
    #[error("{0}")]
    Upstream(String),
}

impl ToolError {
    /// Create a new "invalid input" error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "upstream" error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_message_verbatim() {
        // The message becomes the error envelope text, so no variant may
        // prepend a prefix.
        assert_eq!(
            ToolError::invalid_input("missing closing parenthesis").to_string(),
            "missing closing parenthesis"
        );
        assert_eq!(
            ToolError::not_found("city not found: Atlantis").to_string(),
            "city not found: Atlantis"
        );
        assert_eq!(
            ToolError::upstream("URL fetch failed: timeout").to_string(),
            "URL fetch failed: timeout"
        );
    }
}
