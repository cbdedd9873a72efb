//! Domain modules organized by bounded context.
//!
//! Currently the server exposes a single bounded context: tools.

pub mod tools;
