//! OpenAPI tool generator
//!
//! Generates tool descriptors from an OpenAPI 3.0 specification at startup:
//! one descriptor per declared path/method operation, each carrying an input
//! schema inferred from the declared parameters and an invocation that
//! performs the underlying HTTP call against the bound base address. This is
//! an explicit code-generation-at-startup step producing plain descriptors —
//! there is no reflection-based dispatch at request time.

use crate::error::{BridgeError, Result};
use crate::registry::types::{ToolDescriptor, ToolHandler, ToolOrigin};
use async_trait::async_trait;
use openapiv3::{OpenAPI, Operation, Parameter, ReferenceOr};
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Generates tool descriptors from an OpenAPI specification.
///
/// The generator runs synchronously once at startup; generation is atomic —
/// a malformed schema document fails the whole run and no partial tool set
/// is produced.
pub struct OpenApiToolGenerator {
    /// Base URL the generated operations are bound to
    base_url: String,
    /// Pre-configured HTTP client shared by all generated handlers
    client: reqwest::Client,
    /// Explicit renames from schema operation id to registry name.
    /// This is the collision-avoidance seam for merging generated tools
    /// with hand-written ones.
    rename_map: HashMap<String, String>,
    /// Whether to generate tools for deprecated operations
    include_deprecated: bool,
}

/// One extracted schema operation, before descriptor conversion
#[derive(Debug, Clone)]
struct SchemaOperation {
    method: String,
    path: String,
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    path_params: Vec<ParamSpec>,
    query_params: Vec<ParamSpec>,
    has_body: bool,
    body_description: Option<String>,
    body_required: bool,
    deprecated: bool,
}

/// A declared path or query parameter
#[derive(Debug, Clone)]
struct ParamSpec {
    name: String,
    required: bool,
    schema: Value,
}

impl OpenApiToolGenerator {
    /// Create a new generator bound to a base URL and HTTP client
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client,
            rename_map: HashMap::new(),
            include_deprecated: false,
        }
    }

    /// Set the operation-id rename map
    pub fn with_rename_map(mut self, rename_map: HashMap<String, String>) -> Self {
        self.rename_map = rename_map;
        self
    }

    /// Include deprecated operations
    pub fn include_deprecated(mut self) -> Self {
        self.include_deprecated = true;
        self
    }

    /// Generate tool descriptors from an OpenAPI 3.0 document (JSON or YAML).
    pub fn generate(&self, spec_content: &str) -> Result<Vec<ToolDescriptor>> {
        let spec = self.parse_spec(spec_content)?;
        let operations = self.extract_operations(&spec);

        let mut descriptors = Vec::with_capacity(operations.len());
        for operation in operations {
            descriptors.push(self.operation_to_descriptor(operation)?);
        }
        Ok(descriptors)
    }

    /// Parse an OpenAPI 3.0 document, trying JSON first and then YAML
    fn parse_spec(&self, spec_content: &str) -> Result<OpenAPI> {
        if let Ok(spec) = serde_json::from_str::<OpenAPI>(spec_content) {
            return Ok(spec);
        }

        serde_yaml::from_str::<OpenAPI>(spec_content).map_err(|e| {
            BridgeError::schema_parse(format!("Failed to parse OpenAPI specification: {}", e))
        })
    }

    /// Extract operations from all paths of the specification
    fn extract_operations(&self, spec: &OpenAPI) -> Vec<SchemaOperation> {
        let mut operations = Vec::new();

        for (path, path_item) in &spec.paths.paths {
            if let Some(item) = path_item.as_item() {
                let methods: [(&str, &Option<Operation>); 5] = [
                    ("GET", &item.get),
                    ("POST", &item.post),
                    ("PUT", &item.put),
                    ("PATCH", &item.patch),
                    ("DELETE", &item.delete),
                ];
                for (method, operation) in methods {
                    if let Some(op) = operation {
                        if op.deprecated && !self.include_deprecated {
                            debug!("Skipping deprecated operation {} {}", method, path);
                            continue;
                        }
                        operations.push(self.convert_operation(path, method, op));
                    }
                }
            }
        }

        operations
    }

    /// Convert one schema operation into the internal representation
    fn convert_operation(&self, path: &str, method: &str, operation: &Operation) -> SchemaOperation {
        let mut path_params = Vec::new();
        let mut query_params = Vec::new();

        for param_ref in &operation.parameters {
            if let Some(param) = param_ref.as_item() {
                match param {
                    Parameter::Path { parameter_data, .. } => path_params.push(ParamSpec {
                        name: parameter_data.name.clone(),
                        // Path parameters are always required
                        required: true,
                        schema: parameter_schema(param),
                    }),
                    Parameter::Query { parameter_data, .. } => query_params.push(ParamSpec {
                        name: parameter_data.name.clone(),
                        required: parameter_data.required,
                        schema: parameter_schema(param),
                    }),
                    // Header and cookie parameters are not exposed as tool arguments
                    _ => {}
                }
            }
        }

        let (has_body, body_description, body_required) = match &operation.request_body {
            Some(body_ref) => match body_ref.as_item() {
                Some(body) if body.content.contains_key("application/json") => {
                    (true, body.description.clone(), body.required)
                }
                _ => (false, None, false),
            },
            None => (false, None, false),
        };

        SchemaOperation {
            method: method.to_uppercase(),
            path: path.to_string(),
            operation_id: operation.operation_id.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            path_params,
            query_params,
            has_body,
            body_description,
            body_required,
            deprecated: operation.deprecated,
        }
    }

    /// Convert an extracted operation into a tool descriptor
    fn operation_to_descriptor(&self, operation: SchemaOperation) -> Result<ToolDescriptor> {
        let name = self.tool_name(&operation);
        let description = self.tool_description(&operation);
        let input_schema = self.input_schema(&operation);

        let method = match operation.method.as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            other => {
                return Err(BridgeError::schema_parse(format!(
                    "Unsupported HTTP method '{}' for operation '{}'",
                    other, name
                )))
            }
        };

        let handler = HttpOperationHandler {
            name: name.clone(),
            client: self.client.clone(),
            method,
            url_template: format!("{}{}", self.base_url, operation.path),
            path_params: operation.path_params.iter().map(|p| p.name.clone()).collect(),
            query_params: operation.query_params.iter().map(|p| p.name.clone()).collect(),
            has_body: operation.has_body,
        };

        ToolDescriptor::new(
            name,
            description,
            input_schema,
            ToolOrigin::SchemaGenerated,
            Arc::new(handler),
        )
    }

    /// Default name from the operation id (method + path fallback), then the
    /// rename map applied on top
    fn tool_name(&self, operation: &SchemaOperation) -> String {
        let default_name = operation.operation_id.clone().unwrap_or_else(|| {
            format!(
                "{}_{}",
                operation.method.to_lowercase(),
                operation.path.replace('/', "_").replace(['{', '}'], "")
            )
        });

        match self.rename_map.get(&default_name) {
            Some(renamed) => renamed.clone(),
            None => default_name,
        }
    }

    fn tool_description(&self, operation: &SchemaOperation) -> String {
        let mut description = operation
            .description
            .clone()
            .or_else(|| operation.summary.clone())
            .unwrap_or_else(|| format!("{} {}", operation.method, operation.path));

        if description.trim().is_empty() {
            description = format!("{} {}", operation.method, operation.path);
        }

        if operation.deprecated {
            description = format!("DEPRECATED: {}", description);
        }

        description
    }

    /// Synthesize the JSON Schema for the tool's arguments from the declared
    /// path and query parameters plus an optional JSON request body
    fn input_schema(&self, operation: &SchemaOperation) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in operation.path_params.iter().chain(&operation.query_params) {
            properties.insert(param.name.clone(), param.schema.clone());
            if param.required {
                required.push(param.name.clone());
            }
        }

        if operation.has_body {
            properties.insert(
                "body".to_string(),
                json!({
                    "type": "object",
                    "description": operation
                        .body_description
                        .clone()
                        .unwrap_or_else(|| "Request body".to_string())
                }),
            );
            if operation.body_required {
                required.push("body".to_string());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

/// Extract the JSON Schema of a parameter, falling back to a plain string
/// schema for references and non-schema content
fn parameter_schema(parameter: &Parameter) -> Value {
    let parameter_data = parameter.parameter_data_ref();
    match &parameter_data.format {
        openapiv3::ParameterSchemaOrContent::Schema(schema_ref) => match schema_ref {
            ReferenceOr::Item(schema) => {
                serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "string"}))
            }
            ReferenceOr::Reference { .. } => json!({"type": "string"}),
        },
        openapiv3::ParameterSchemaOrContent::Content(_) => json!({"type": "string"}),
    }
}

/// Closure-captured HTTP invocation behind a generated descriptor.
///
/// Substitutes caller arguments into the declared parameter slots (path,
/// query, or body) and returns the parsed response body, or the raw text if
/// the response is not JSON.
struct HttpOperationHandler {
    name: String,
    client: reqwest::Client,
    method: Method,
    url_template: String,
    path_params: Vec<String>,
    query_params: Vec<String>,
    has_body: bool,
}

impl HttpOperationHandler {
    /// Render a JSON argument into its URL form
    fn render_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn build_url(&self, arguments: &Value) -> Result<String> {
        let mut url = self.url_template.clone();
        for param in &self.path_params {
            let value = arguments.get(param).ok_or_else(|| {
                BridgeError::validation(format!(
                    "Tool '{}' is missing required path parameter '{}'",
                    self.name, param
                ))
            })?;
            let rendered = Self::render_value(value);
            url = url.replace(
                &format!("{{{}}}", param),
                &urlencoding::encode(&rendered),
            );
        }
        Ok(url)
    }
}

#[async_trait]
impl ToolHandler for HttpOperationHandler {
    async fn invoke(&self, arguments: &Value) -> Result<Value> {
        let url = self.build_url(arguments)?;

        let mut request = self.client.request(self.method.clone(), &url);

        let query: Vec<(String, String)> = self
            .query_params
            .iter()
            .filter_map(|param| {
                arguments
                    .get(param)
                    .filter(|v| !v.is_null())
                    .map(|v| (param.clone(), Self::render_value(v)))
            })
            .collect();
        if !query.is_empty() {
            request = request.query(&query);
        }

        if self.has_body {
            if let Some(body) = arguments.get("body") {
                request = request.json(body);
            }
        }

        debug!("Invoking generated tool '{}': {} {}", self.name, self.method, url);

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BridgeError::remote(status.as_u16(), body));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) => Ok(Value::String(body)),
        }
    }
}
