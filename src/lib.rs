//! TogoMCP - MCP server for biological RDF databases
//!
//! This crate provides an MCP server that bridges two tool provenances into
//! one dispatch namespace: hand-written tools over the RDF Portal SPARQL
//! endpoints, and tools generated at startup from the TogoID OpenAPI
//! specification.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod mcp;
pub mod registry;
pub mod sparql;
pub mod tools;

pub use config::Config;
pub use error::{BridgeError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
