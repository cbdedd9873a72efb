//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod calculator;
pub mod common;
pub mod memory;
pub mod url_fetch;
pub mod weather;

pub use calculator::{CalculatorParams, CalculatorTool};
pub use memory::{MemoryParams, MemoryTool};
pub use url_fetch::{HttpMethod, UrlFetchParams, UrlFetchTool};
pub use weather::{WeatherParams, WeatherTool};
