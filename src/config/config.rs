//! Configuration management for TogoMCP
//!
//! All configuration is loaded explicitly by the process entry point and
//! threaded through constructors — no module-level globals. Environment
//! variables override the file values for host and port.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Default functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_timeout() -> u64 {
    30
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// SPARQL endpoint table configuration
    pub endpoints: EndpointsConfig,
    /// TogoID OpenAPI tool generation configuration
    pub togoid: TogoidConfig,
    /// NCBI E-utilities search configuration (tool omitted when absent)
    pub ncbi: Option<NcbiConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout: default_timeout(),
        }
    }
}

/// SPARQL endpoint table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Path to the endpoints CSV file (header row, then display_name,url)
    pub csv_path: PathBuf,
}

/// TogoID OpenAPI tool generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogoidConfig {
    /// Path to the OpenAPI specification document (JSON or YAML)
    pub spec_path: PathBuf,
    /// Base URL the generated tools are bound to
    pub base_url: String,
    /// Renames from schema operation id to registry name, applied at
    /// generation time to avoid collisions with hand-written tools
    #[serde(default)]
    pub mcp_names: HashMap<String, String>,
}

/// NCBI E-utilities configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcbiConfig {
    /// Contact email, required by NCBI on every request
    pub email: String,
    /// Optional API key for the higher rate limit
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file, apply environment overrides,
    /// and validate. Any failure here aborts startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config: Config = serde_yaml::from_str(&content).map_err(|e| {
            BridgeError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TOGOMCP_HOST` / `TOGOMCP_PORT` environment overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("TOGOMCP_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("TOGOMCP_PORT") {
            self.server.port = port.parse().map_err(|_| {
                BridgeError::config(format!("Invalid TOGOMCP_PORT value: {}", port))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(BridgeError::config("Server host cannot be empty"));
        }

        if self.server.port == 0 {
            return Err(BridgeError::config("Server port cannot be 0"));
        }

        if self.server.timeout == 0 {
            return Err(BridgeError::config("Server timeout cannot be 0"));
        }

        if self.endpoints.csv_path.as_os_str().is_empty() {
            return Err(BridgeError::config("endpoints.csv_path cannot be empty"));
        }

        if self.togoid.spec_path.as_os_str().is_empty() {
            return Err(BridgeError::config("togoid.spec_path cannot be empty"));
        }

        url::Url::parse(&self.togoid.base_url).map_err(|e| {
            BridgeError::config(format!(
                "Invalid togoid.base_url '{}': {}",
                self.togoid.base_url, e
            ))
        })?;

        if let Some(ncbi) = &self.ncbi {
            if ncbi.email.trim().is_empty() {
                return Err(BridgeError::config("ncbi.email cannot be empty"));
            }
        }

        Ok(())
    }
}
