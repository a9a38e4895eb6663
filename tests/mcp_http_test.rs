//! HTTP-level tests for the MCP JSON-RPC and REST routes

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use togomcp::endpoints::EndpointTable;
use togomcp::mcp::{configure_routes, McpServer, PROTOCOL_VERSION};
use togomcp::registry::ToolRegistry;
use togomcp::sparql::SparqlExecutor;
use togomcp::tools::{ExecuteSparqlTool, GetSparqlEndpointsTool};

fn mcp_server() -> web::Data<Arc<McpServer>> {
    let csv = "name,url\n\
               \"UniProt KB\",https://sparql.uniprot.org/sparql\n\
               RDF Portal,https://rdfportal.org/backend/sparql\n";
    let table = Arc::new(EndpointTable::parse(csv).unwrap());
    let executor = SparqlExecutor::new(Arc::clone(&table), Duration::from_secs(5)).unwrap();

    let mut registry = ToolRegistry::new();
    registry
        .register(GetSparqlEndpointsTool::descriptor(table).unwrap())
        .unwrap();
    registry
        .register(ExecuteSparqlTool::descriptor(executor).unwrap())
        .unwrap();
    registry.begin_serving();

    web::Data::new(Arc::new(McpServer::new(Arc::new(registry))))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(mcp_server())
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], json!("healthy"));
}

#[actix_rt::test]
async fn test_jsonrpc_initialize() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["jsonrpc"], json!("2.0"));
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
}

#[actix_rt::test]
async fn test_jsonrpc_tools_list() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["execute_sparql", "get_sparql_endpoints"]);
    assert!(tools[0]["inputSchema"].is_object());
}

#[actix_rt::test]
async fn test_jsonrpc_tools_call_returns_endpoint_map() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "get_sparql_endpoints", "arguments": {}}
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let result = &body["result"];
    assert_eq!(result["isError"], json!(false));

    let text = result["content"][0]["text"].as_str().unwrap();
    let endpoints: Value = serde_json::from_str(text).unwrap();
    assert_eq!(
        endpoints["uniprotkb"],
        json!("https://sparql.uniprot.org/sparql")
    );
    assert_eq!(
        endpoints["rdfportal"],
        json!("https://rdfportal.org/backend/sparql")
    );
}

#[actix_rt::test]
async fn test_jsonrpc_missing_argument_is_tool_error_not_protocol_error() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "execute_sparql", "arguments": {"dbname": "uniprotkb"}}
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["error"].is_null());
    assert_eq!(body["result"]["isError"], json!(true));
}

#[actix_rt::test]
async fn test_jsonrpc_unknown_method() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["error"]["code"], json!(-32601));
}

#[actix_rt::test]
async fn test_jsonrpc_notification_gets_204() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/jsonrpc")
        .set_json(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_rest_tool_listing() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/mcp/tools").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["tools"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_rest_call_unknown_tool_is_404() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/mcp/call")
        .set_json(json!({"name": "no_such_tool", "arguments": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}
