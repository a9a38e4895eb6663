use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use togomcp::config::Config;
use togomcp::endpoints::EndpointTable;
use togomcp::mcp::McpServer;
use togomcp::registry::{OpenApiToolGenerator, ToolRegistry};
use togomcp::sparql::SparqlExecutor;
use togomcp::tools::{ExecuteSparqlTool, GetSparqlEndpointsTool, NcbiSearchTool};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = togomcp::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Server host override
    #[arg(long)]
    host: Option<String>,

    /// Server port override
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    info!("TogoMCP v{} starting", togomcp::VERSION);

    let mut config = Config::load(&cli.config).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!(e)
    })?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let registry = build_registry(&config).await.map_err(|e| {
        error!("Startup failed: {}", e);
        anyhow::anyhow!(e)
    })?;

    let server = McpServer::new(Arc::new(registry));
    server
        .run(&config.server.host, config.server.port)
        .await
        .context("MCP server terminated with an error")?;

    Ok(())
}

/// Build the tool registry: endpoint table, hand-written tools, then the
/// generated TogoID tools merged in atomically. Any failure here is fatal —
/// an inconsistent namespace must never be served.
async fn build_registry(config: &Config) -> togomcp::Result<ToolRegistry> {
    let timeout = Duration::from_secs(config.server.timeout);

    let table = Arc::new(EndpointTable::load(&config.endpoints.csv_path)?);
    info!(
        "Loaded {} SPARQL endpoints from {}",
        table.len(),
        config.endpoints.csv_path.display()
    );

    let executor = SparqlExecutor::new(Arc::clone(&table), timeout)?;

    let mut registry = ToolRegistry::new();
    registry.register(GetSparqlEndpointsTool::descriptor(Arc::clone(&table))?)?;
    registry.register(ExecuteSparqlTool::descriptor(executor)?)?;

    if let Some(ncbi) = &config.ncbi {
        let client = http_client(timeout)?;
        registry.register(NcbiSearchTool::descriptor(
            client,
            ncbi.email.as_str(),
            ncbi.api_key.clone(),
        )?)?;
        info!("NCBI esearch tool enabled");
    }

    let spec_content = std::fs::read_to_string(&config.togoid.spec_path).map_err(|e| {
        togomcp::BridgeError::config(format!(
            "Failed to read OpenAPI specification {}: {}",
            config.togoid.spec_path.display(),
            e
        ))
    })?;

    let generator = OpenApiToolGenerator::new(config.togoid.base_url.as_str(), http_client(timeout)?)
        .with_rename_map(config.togoid.mcp_names.clone());
    let generated = generator.generate(&spec_content)?;
    info!(
        "Generated {} tools from {}",
        generated.len(),
        config.togoid.spec_path.display()
    );

    registry.register_all(generated)?;
    registry.begin_serving();

    Ok(registry)
}

fn http_client(timeout: Duration) -> togomcp::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| togomcp::BridgeError::config(format!("Failed to build HTTP client: {}", e)))
}

fn init_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
