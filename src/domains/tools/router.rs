//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for the STDIO/TCP transports by
//! delegating to the tool definitions themselves. Each tool knows how to
//! create its own route; shared dependencies (config, memory store) are
//! injected here.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;
use crate::domains::tools::MemoryStore;

use super::definitions::{CalculatorTool, MemoryTool, UrlFetchTool, WeatherTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>, store: Arc<MemoryStore>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(WeatherTool::create_route(config))
        .with_route(CalculatorTool::create_route())
        .with_route(UrlFetchTool::create_route())
        .with_route(MemoryTool::create_route(store))
}
