//! MCP (Model Context Protocol) layer
//!
//! The HTTP/JSON-RPC surface through which the tool registry is exposed.

pub mod server;
pub mod types;

pub use server::{configure_routes, McpServer};
pub use types::{
    McpError, McpErrorCode, McpRequest, McpResponse, ToolCall, ToolContent, ToolResult,
    PROTOCOL_VERSION,
};
