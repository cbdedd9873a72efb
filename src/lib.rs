//! MCP Tool Server Library
//!
//! This crate provides a multi-transport Model Context Protocol (MCP) server
//! exposing a small set of callable tools: weather lookup, arithmetic
//! evaluation, URL fetching and a process-wide key/value memory.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, the server
//!   handler and the transport layer
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: the tool definitions, registry, router and shared memory store
//!
//! # Example
//!
//! ```rust,no_run
//! use ai_tools_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, McpServer};
