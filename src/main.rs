//! OTRS MCP - MCP server for the OTRS help desk system
//!
//! This binary runs as an MCP server, allowing Claude Code or Claude
//! Desktop to interact with OTRS through natural language. It serves
//! over stdio by default; SSE and streamable HTTP transports are
//! available for HTTP clients.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `OTRS_BASE_URL`: Full URL of the OTRS REST web service endpoint
//! - `OTRS_USERNAME`: OTRS agent login
//! - `OTRS_PASSWORD`: OTRS agent password
//!
//! # Usage
//!
//! ```bash
//! # Direct execution (stdio transport)
//! ./otrs-mcp
//!
//! # HTTP transport on a custom port
//! ./otrs-mcp --transport streamable-http --port 9000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use otrs_mcp::{cli::Cli, config, otrs_client, runtime, server, transport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Initialize logging to stderr (critical for stdio transport!)
    // stdout is reserved for MCP JSON-RPC messages and the startup summary
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("otrs_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting OTRS MCP server v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let options = runtime::resolve(&cli);

    // Print the configuration summary and stop before serving anything
    // if the required OTRS variables are missing.
    if !config::validate_environment(&options) {
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    // Create the OTRS client
    let otrs_client =
        otrs_client::OtrsClient::new(&config).context("Failed to create OTRS client")?;

    tracing::debug!("OTRS client initialized");

    // Create the MCP server
    let server = server::OtrsServer::new(otrs_client);

    runtime::print_startup_banner(&options);

    transport::run(server, &options).await
}
