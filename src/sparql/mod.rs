//! SPARQL query executor
//!
//! Resolves a canonical database key against the endpoint table and posts
//! the query to the endpoint, requesting CSV results. One outbound call per
//! invocation, no local state mutation, no retry — retries are a caller
//! policy, not part of this contract.

use crate::endpoints::EndpointTable;
use crate::error::{BridgeError, Result};
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Executes SPARQL queries against named endpoints
#[derive(Clone)]
pub struct SparqlExecutor {
    table: Arc<EndpointTable>,
    client: reqwest::Client,
}

impl SparqlExecutor {
    /// Create a new executor over an endpoint table.
    ///
    /// The client carries a bounded timeout so a stalled endpoint cannot
    /// hold resources indefinitely.
    pub fn new(table: Arc<EndpointTable>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { table, client })
    }

    /// The endpoint table this executor resolves against
    pub fn table(&self) -> &EndpointTable {
        &self.table
    }

    /// Execute a SPARQL query against the named database.
    ///
    /// The key is checked against the endpoint table before any network
    /// activity; an unknown key fails with `UnknownDatabase` and has no
    /// side effect. On success the CSV response body is returned verbatim.
    pub async fn execute(&self, query: &str, dbname: &str) -> Result<String> {
        let url = self
            .table
            .url(dbname)
            .ok_or_else(|| BridgeError::unknown_database(dbname))?;

        debug!("Executing SPARQL query against '{}' ({})", dbname, url);

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "text/csv")
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BridgeError::remote(status.as_u16(), body));
        }

        Ok(body)
    }
}
