//! MCP server over HTTP
//!
//! Exposes the tool registry through a JSON-RPC endpoint plus plain REST
//! conveniences. The registry is fully populated and frozen before this
//! server binds, so request handling only reads shared immutable state;
//! per-call failures are reported to the caller and never crash the
//! serving process.

use crate::error::{BridgeError, Result};
use crate::mcp::types::{
    McpErrorCode, McpRequest, McpResponse, ToolCall, ToolResult, PROTOCOL_VERSION,
};
use crate::registry::ToolRegistry;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP server wrapping the frozen tool registry
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server over a registry
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Run the HTTP server until shutdown
    pub async fn run(self, host: &str, port: u16) -> Result<()> {
        info!(
            "Starting MCP server on {}:{} ({} tools)",
            host,
            port,
            self.registry.len()
        );

        let server_data = web::Data::new(Arc::new(self));
        HttpServer::new(move || {
            App::new()
                .app_data(server_data.clone())
                .configure(configure_routes)
        })
        .bind((host, port))?
        .run()
        .await?;

        Ok(())
    }

    /// Handle one JSON-RPC request. Returns None for notifications.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("Handling MCP request: {}", request.method);

        // A request without an id is a notification and never gets a
        // response, whatever its method.
        if request.id.is_none() {
            return None;
        }

        match request.method.as_str() {
            "initialize" => Some(McpResponse::success(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            )),
            "ping" => Some(McpResponse::success(request.id, json!({}))),
            "tools/list" => Some(McpResponse::success(
                request.id,
                json!({ "tools": self.registry.list_tools() }),
            )),
            "tools/call" => {
                let tool_call: ToolCall = match request
                    .params
                    .ok_or(())
                    .and_then(|p| serde_json::from_value(p).map_err(|_| ()))
                {
                    Ok(call) => call,
                    Err(()) => {
                        return Some(McpResponse::error(
                            request.id,
                            McpErrorCode::InvalidParams,
                            "tools/call requires 'name' and 'arguments' params",
                        ))
                    }
                };

                let result = self.call_tool(&tool_call).await;
                match result {
                    CallOutcome::Result(tool_result) => Some(McpResponse::success(
                        request.id,
                        serde_json::to_value(tool_result).unwrap_or(Value::Null),
                    )),
                    CallOutcome::UnknownTool(name) => Some(McpResponse::error(
                        request.id,
                        McpErrorCode::InvalidParams,
                        format!("Unknown tool: '{}'", name),
                    )),
                }
            }
            other => Some(McpResponse::error(
                request.id,
                McpErrorCode::MethodNotFound,
                format!("Method not found: {}", other),
            )),
        }
    }

    /// Dispatch a tool call into the registry, mapping errors to an MCP
    /// tool result (except unknown names, which are protocol errors)
    async fn call_tool(&self, tool_call: &ToolCall) -> CallOutcome {
        match self.registry.invoke(&tool_call.name, &tool_call.arguments).await {
            Ok(value) => CallOutcome::Result(ToolResult::success(&value)),
            Err(BridgeError::UnknownTool { name }) => CallOutcome::UnknownTool(name),
            Err(e) => {
                warn!(
                    "Tool '{}' failed (category: {}): {}",
                    tool_call.name,
                    e.category(),
                    e
                );
                CallOutcome::Result(ToolResult::error(e.to_string()))
            }
        }
    }
}

enum CallOutcome {
    Result(ToolResult),
    UnknownTool(String),
}

/// Register the HTTP routes on an actix service config.
///
/// Shared between `McpServer::run` and the test harness; expects an
/// `Arc<McpServer>` in app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler))
        .route("/mcp/jsonrpc", web::post().to(jsonrpc_handler))
        .route("/mcp/tools", web::get().to(list_tools_handler))
        .route("/mcp/call", web::post().to(call_tool_handler));
}

/// Liveness probe
async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// JSON-RPC endpoint
async fn jsonrpc_handler(
    server: web::Data<Arc<McpServer>>,
    body: web::Json<McpRequest>,
) -> HttpResponse {
    match server.handle_request(body.into_inner()).await {
        Some(response) => HttpResponse::Ok().json(response),
        None => HttpResponse::NoContent().finish(),
    }
}

/// Plain REST tool listing
async fn list_tools_handler(server: web::Data<Arc<McpServer>>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "tools": server.registry.list_tools() }))
}

/// Plain REST tool invocation
async fn call_tool_handler(
    server: web::Data<Arc<McpServer>>,
    body: web::Json<ToolCall>,
) -> HttpResponse {
    let tool_call = body.into_inner();
    match server.call_tool(&tool_call).await {
        CallOutcome::Result(result) => HttpResponse::Ok().json(result),
        CallOutcome::UnknownTool(name) => HttpResponse::NotFound().json(json!({
            "error": format!("Unknown tool: '{}'", name)
        })),
    }
}
