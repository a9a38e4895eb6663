//! Error types and handling for TogoMCP

use thiserror::Error;

/// Result type alias for TogoMCP operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for the TogoMCP bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration errors (endpoint table, config file). Fatal at startup.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Unparseable OpenAPI schema document. Fatal at startup.
    #[error("Schema parse error: {message}")]
    SchemaParse { message: String },

    /// Duplicate tool name detected during registry merge. Fatal at startup.
    #[error("Tool name collision: '{name}' is already registered")]
    NameCollision { name: String },

    /// Registry lifecycle errors (e.g. registration after serving started)
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Query dispatched against a database key not in the endpoint table
    #[error("Unknown database: '{name}'")]
    UnknownDatabase { name: String },

    /// Invocation of a tool name not present in the registry
    #[error("Unknown tool: '{name}'")]
    UnknownTool { name: String },

    /// Non-success status from a remote endpoint
    #[error("Remote endpoint returned status {status}: {body}")]
    Remote { status: u16, body: String },

    /// Tool execution errors
    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors (network, DNS, timeout)
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BridgeError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a schema parse error
    pub fn schema_parse<S: Into<String>>(message: S) -> Self {
        Self::SchemaParse {
            message: message.into(),
        }
    }

    /// Create a name collision error
    pub fn name_collision<S: Into<String>>(name: S) -> Self {
        Self::NameCollision { name: name.into() }
    }

    /// Create a registry error
    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create an unknown database error
    pub fn unknown_database<S: Into<String>>(name: S) -> Self {
        Self::UnknownDatabase { name: name.into() }
    }

    /// Create an unknown tool error
    pub fn unknown_tool<S: Into<String>>(name: S) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create a remote status error
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a tool execution error
    pub fn tool_execution(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BridgeError::Config { .. } => "config",
            BridgeError::SchemaParse { .. } => "schema_parse",
            BridgeError::NameCollision { .. } => "name_collision",
            BridgeError::Registry { .. } => "registry",
            BridgeError::UnknownDatabase { .. } => "unknown_database",
            BridgeError::UnknownTool { .. } => "unknown_tool",
            BridgeError::Remote { .. } => "remote",
            BridgeError::ToolExecution { .. } => "tool_execution",
            BridgeError::Validation { .. } => "validation",
            BridgeError::Io(_) => "io",
            BridgeError::Serde(_) => "serialization",
            BridgeError::Yaml(_) => "yaml",
            BridgeError::Http(_) => "http",
            BridgeError::Internal(_) => "internal",
        }
    }
}
