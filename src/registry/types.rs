//! Registry types and structures

use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Where a tool came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOrigin {
    /// Authored directly in this crate
    HandWritten,
    /// Generated at startup from an OpenAPI schema document
    SchemaGenerated,
}

impl fmt::Display for ToolOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOrigin::HandWritten => write!(f, "hand_written"),
            ToolOrigin::SchemaGenerated => write!(f, "schema_generated"),
        }
    }
}

/// Invocation capability behind a tool descriptor.
///
/// Handlers are owned exclusively by their descriptor and must be safe to
/// call concurrently; each invocation performs at most one independent
/// outbound call and touches no shared mutable state.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool with the given JSON arguments
    async fn invoke(&self, arguments: &Value) -> Result<Value>;
}

/// One invocable operation, regardless of origin
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Dispatch key, unique within the registry
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for input parameters
    pub input_schema: Value,
    /// Tool provenance
    pub origin: ToolOrigin,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Create a new tool descriptor with validation
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        origin: ToolOrigin,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self> {
        let descriptor = Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            origin,
            handler,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::validation("Tool name cannot be empty"));
        }

        if self.description.trim().is_empty() {
            return Err(BridgeError::validation(format!(
                "Tool '{}' description cannot be empty",
                self.name
            )));
        }

        if !self.input_schema.is_object() {
            return Err(BridgeError::validation(format!(
                "Input schema for tool '{}' must be a JSON object",
                self.name
            )));
        }

        if jsonschema::JSONSchema::compile(&self.input_schema).is_err() {
            return Err(BridgeError::validation(format!(
                "Invalid JSON Schema for tool '{}'",
                self.name
            )));
        }

        Ok(())
    }

    /// Invoke the tool's handler
    pub async fn invoke(&self, arguments: &Value) -> Result<Value> {
        self.handler.invoke(arguments).await
    }

    /// Listing entry for this descriptor
    pub fn listing(&self) -> ToolListing {
        ToolListing {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Serializable tool listing entry for `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListing {
    /// Tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}
