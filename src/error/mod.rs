//! Error handling module for TogoMCP
//!
//! This module provides the error taxonomy shared by the endpoint table,
//! the SPARQL executor, the tool registry and the MCP protocol layer.

mod error;

// Re-export the main error types and utilities
pub use error::{BridgeError, Result};
