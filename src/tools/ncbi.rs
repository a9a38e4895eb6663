//! NCBI E-utilities keyword search tool
//!
//! Wraps the esearch endpoint with the fixed-interval rate limiting NCBI
//! requires: at most 3 requests/second without an API key, 10 with one.
//! NCBI also asks for a contact email on every request.

use crate::error::{BridgeError, Result};
use crate::registry::{ToolDescriptor, ToolHandler, ToolOrigin};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default esearch endpoint
pub const NCBI_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// `ncbi_esearch` — keyword search against NCBI databases
pub struct NcbiSearchTool {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_key: Option<String>,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NcbiSearchTool {
    pub fn new(client: reqwest::Client, email: impl Into<String>, api_key: Option<String>) -> Self {
        let min_interval = if api_key.is_some() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(340)
        };
        Self {
            client,
            base_url: NCBI_ESEARCH_URL.to_string(),
            email: email.into(),
            api_key,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Override the esearch URL (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the registry descriptor for this tool
    pub fn descriptor(
        client: reqwest::Client,
        email: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<ToolDescriptor> {
        ToolDescriptor::new(
            "ncbi_esearch",
            "Keyword search against an NCBI database (gene, pubmed, taxonomy, medgen, pmc) \
             via E-utilities esearch. Returns matching record IDs and counts.",
            json!({
                "type": "object",
                "properties": {
                    "db": {
                        "type": "string",
                        "description": "NCBI database name, e.g. gene, pubmed, taxonomy, medgen, pmc."
                    },
                    "term": {
                        "type": "string",
                        "description": "Search query (keywords, gene symbols, organism names, ...)."
                    },
                    "retmax": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default 20)."
                    },
                    "retstart": {
                        "type": "integer",
                        "description": "Starting index for pagination (default 0)."
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort order, e.g. relevance or pub_date."
                    },
                    "mindate": {
                        "type": "string",
                        "description": "Minimum date filter (YYYY/MM/DD)."
                    },
                    "maxdate": {
                        "type": "string",
                        "description": "Maximum date filter (YYYY/MM/DD)."
                    }
                },
                "required": ["db", "term"]
            }),
            ToolOrigin::HandWritten,
            Arc::new(Self::new(client, email, api_key)),
        )
    }

    /// Enforce the fixed minimum interval between outbound requests
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl ToolHandler for NcbiSearchTool {
    async fn invoke(&self, arguments: &Value) -> Result<Value> {
        let db = arguments
            .get("db")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::validation("Missing required argument 'db'"))?;
        let term = arguments
            .get("term")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::validation("Missing required argument 'term'"))?;

        let retmax = arguments.get("retmax").and_then(Value::as_u64).unwrap_or(20);
        let retstart = arguments.get("retstart").and_then(Value::as_u64).unwrap_or(0);

        let mut params: Vec<(String, String)> = vec![
            ("db".into(), db.to_string()),
            ("term".into(), term.to_string()),
            ("retmax".into(), retmax.to_string()),
            ("retstart".into(), retstart.to_string()),
            ("retmode".into(), "json".into()),
            ("email".into(), self.email.clone()),
        ];

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".into(), api_key.clone()));
        }

        for optional in ["sort", "mindate", "maxdate"] {
            if let Some(value) = arguments.get(optional).and_then(Value::as_str) {
                params.push((optional.into(), value.to_string()));
            }
        }

        self.rate_limit().await;

        debug!("NCBI esearch: db={} term={}", db, term);

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BridgeError::remote(status.as_u16(), body));
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            BridgeError::tool_execution(
                "ncbi_esearch",
                format!("esearch returned a non-JSON body: {}", e),
            )
        })?;
        // esearch wraps the useful payload in an esearchresult object
        match data.get("esearchresult") {
            Some(result) => Ok(result.clone()),
            None => Ok(data),
        }
    }
}
