//! SPARQL tools: endpoint listing and query execution

use crate::endpoints::EndpointTable;
use crate::error::{BridgeError, Result};
use crate::registry::{ToolDescriptor, ToolHandler, ToolOrigin};
use crate::sparql::SparqlExecutor;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// `get_sparql_endpoints` — lists the configured SPARQL endpoints
pub struct GetSparqlEndpointsTool {
    table: Arc<EndpointTable>,
}

impl GetSparqlEndpointsTool {
    pub fn new(table: Arc<EndpointTable>) -> Self {
        Self { table }
    }

    /// Build the registry descriptor for this tool
    pub fn descriptor(table: Arc<EndpointTable>) -> Result<ToolDescriptor> {
        ToolDescriptor::new(
            "get_sparql_endpoints",
            "List the supported RDF databases and their SPARQL endpoint URLs.",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            ToolOrigin::HandWritten,
            Arc::new(Self::new(table)),
        )
    }
}

#[async_trait]
impl ToolHandler for GetSparqlEndpointsTool {
    async fn invoke(&self, _arguments: &Value) -> Result<Value> {
        let mut endpoints = Map::new();
        for key in self.table.keys() {
            if let Some(url) = self.table.url(key) {
                endpoints.insert(key.to_string(), Value::String(url.to_string()));
            }
        }
        Ok(Value::Object(endpoints))
    }
}

/// `execute_sparql` — runs a SPARQL query against a named database
pub struct ExecuteSparqlTool {
    executor: SparqlExecutor,
}

impl ExecuteSparqlTool {
    pub fn new(executor: SparqlExecutor) -> Self {
        Self { executor }
    }

    /// Build the registry descriptor for this tool
    pub fn descriptor(executor: SparqlExecutor) -> Result<ToolDescriptor> {
        let dbname_description = format!(
            "Database name. One of: {}",
            executor.table().keys().join(", ")
        );
        ToolDescriptor::new(
            "execute_sparql",
            "Execute a SPARQL query on RDF Portal and return the results as CSV.",
            json!({
                "type": "object",
                "properties": {
                    "sparql_query": {
                        "type": "string",
                        "description": "The SPARQL query to execute."
                    },
                    "dbname": {
                        "type": "string",
                        "description": dbname_description
                    }
                },
                "required": ["sparql_query", "dbname"]
            }),
            ToolOrigin::HandWritten,
            Arc::new(Self::new(executor)),
        )
    }
}

#[async_trait]
impl ToolHandler for ExecuteSparqlTool {
    async fn invoke(&self, arguments: &Value) -> Result<Value> {
        let query = arguments
            .get("sparql_query")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::validation("Missing required argument 'sparql_query'"))?;
        let dbname = arguments
            .get("dbname")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::validation("Missing required argument 'dbname'"))?;

        let csv = self.executor.execute(query, dbname).await?;
        Ok(Value::String(csv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn table() -> Arc<EndpointTable> {
        Arc::new(
            EndpointTable::parse(
                "name,url\n\"UniProt KB\",https://example.org/sparql\nMeSH,https://mesh.example/sparql\n",
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_get_sparql_endpoints_lists_table() {
        let tool = GetSparqlEndpointsTool::new(table());
        let result = tool.invoke(&json!({})).await.unwrap();
        assert_eq!(result["uniprotkb"], "https://example.org/sparql");
        assert_eq!(result["mesh"], "https://mesh.example/sparql");
    }

    #[tokio::test]
    async fn test_execute_sparql_requires_arguments() {
        let executor = SparqlExecutor::new(table(), Duration::from_secs(5)).unwrap();
        let tool = ExecuteSparqlTool::new(executor);

        let err = tool.invoke(&json!({"dbname": "mesh"})).await.unwrap_err();
        assert!(matches!(err, BridgeError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_execute_sparql_unknown_database() {
        let executor = SparqlExecutor::new(table(), Duration::from_secs(5)).unwrap();
        let tool = ExecuteSparqlTool::new(executor);

        let err = tool
            .invoke(&json!({"sparql_query": "SELECT * WHERE {?s ?p ?o}", "dbname": "nope"}))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownDatabase { name } if name == "nope"));
    }

    #[test]
    fn test_descriptor_mentions_databases() {
        let executor = SparqlExecutor::new(table(), Duration::from_secs(5)).unwrap();
        let descriptor = ExecuteSparqlTool::descriptor(executor).unwrap();
        let dbname_desc = descriptor.input_schema["properties"]["dbname"]["description"]
            .as_str()
            .unwrap();
        assert!(dbname_desc.contains("uniprotkb"));
        assert!(dbname_desc.contains("mesh"));
    }
}
