//! NCBI esearch tool tests against a mock E-utilities server

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use togomcp::error::BridgeError;
use togomcp::registry::ToolHandler;
use togomcp::tools::NcbiSearchTool;

fn tool_for(server_uri: &str, api_key: Option<String>) -> NcbiSearchTool {
    NcbiSearchTool::new(reqwest::Client::new(), "dev@example.org", api_key)
        .with_base_url(format!("{}/esearch.fcgi", server_uri))
}

#[tokio::test]
async fn test_invoke_sends_eutils_parameters_and_unwraps_esearchresult() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "gene"))
        .and(query_param("term", "TP53"))
        .and(query_param("retmax", "5"))
        .and(query_param("retstart", "0"))
        .and(query_param("retmode", "json"))
        .and(query_param("email", "dev@example.org"))
        .and(query_param("api_key", "secret"))
        .and(query_param("sort", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {"type": "esearch", "version": "0.3"},
            "esearchresult": {
                "count": "2",
                "idlist": ["7157", "24842"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server.uri(), Some("secret".to_string()));
    let result = tool
        .invoke(&json!({
            "db": "gene",
            "term": "TP53",
            "retmax": 5,
            "sort": "relevance"
        }))
        .await
        .unwrap();

    // The envelope is stripped: only the esearchresult payload comes back
    assert_eq!(result["count"], json!("2"));
    assert_eq!(result["idlist"], json!(["7157", "24842"]));
    assert!(result.get("header").is_none());
}

#[tokio::test]
async fn test_invoke_without_api_key_omits_it_and_uses_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "20"))
        .and(query_param("retmode", "json"))
        .and(query_param("email", "dev@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "0", "idlist": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server.uri(), None);
    let result = tool
        .invoke(&json!({"db": "pubmed", "term": "nonexistent"}))
        .await
        .unwrap();

    assert_eq!(result["count"], json!("0"));

    let received = &mock_server.received_requests().await.unwrap()[0];
    assert!(!received.url.query().unwrap().contains("api_key"));
}

#[tokio::test]
async fn test_invoke_returns_body_verbatim_without_esearchresult_wrapper() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Otherdb db is not supported"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server.uri(), None);
    let result = tool
        .invoke(&json!({"db": "otherdb", "term": "x"}))
        .await
        .unwrap();

    assert_eq!(result["error"], json!("Otherdb db is not supported"));
}

#[tokio::test]
async fn test_invoke_rejects_non_json_body() {
    let mock_server = MockServer::start().await;

    // retmode=json is always requested, so an HTML body is a failure
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server.uri(), None);
    let err = tool
        .invoke(&json!({"db": "gene", "term": "TP53"}))
        .await
        .unwrap_err();

    assert!(
        matches!(err, BridgeError::ToolExecution { ref tool_name, .. } if tool_name == "ncbi_esearch")
    );
}

#[tokio::test]
async fn test_invoke_surfaces_remote_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(429).set_body_string("API rate limit exceeded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tool = tool_for(&mock_server.uri(), None);
    let err = tool
        .invoke(&json!({"db": "gene", "term": "TP53"}))
        .await
        .unwrap_err();

    match err {
        BridgeError::Remote { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "API rate limit exceeded");
        }
        other => panic!("Expected Remote error, got {:?}", other.category()),
    }
}
