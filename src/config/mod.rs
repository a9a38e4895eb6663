//! Configuration module for TogoMCP

mod config;

pub use config::{Config, EndpointsConfig, NcbiConfig, ServerConfig, TogoidConfig};
