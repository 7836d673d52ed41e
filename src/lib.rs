//! # OTRS MCP
//!
//! An MCP (Model Context Protocol) server for the OTRS help desk system.
//!
//! It exposes OTRS Generic Interface operations as MCP tools, enabling AI
//! assistants like Claude to manage tickets and browse the CMDB through
//! natural language.
//!
//! ## Features
//!
//! - **Ticket operations**: Create, view, search, update tickets and read their history
//! - **CMDB operations**: View and search configuration items
//! - **Sessions**: Create OTRS sessions for clients that want a token
//! - **Transports**: stdio (default), SSE and streamable HTTP
//! - **Security**: Passwords are never logged or exposed in error messages
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line argument parsing
//! - [`runtime`] - Transport/host/port resolution from CLI and environment
//! - [`config`] - OTRS configuration loading and environment validation
//! - [`error`] - Error types with security-conscious message sanitization
//! - [`otrs_client`] - HTTP client for the OTRS Generic Interface
//! - [`server`] - MCP server implementation with tool routing
//! - [`transport`] - Serving the MCP server over the selected transport
//! - [`models`] - Data models for OTRS requests and responses
//! - [`tools`] - Tool input parameter structs
//!
//! ## Usage
//!
//! The crate is primarily used as a binary. To run:
//!
//! ```bash
//! # Set required environment variables
//! export OTRS_BASE_URL=https://otrs.example.com/otrs/nph-genericinterface.pl/Webservice/GenericTicketConnectorREST
//! export OTRS_USERNAME=agent
//! export OTRS_PASSWORD=secret
//!
//! # Run the server (stdio transport by default)
//! ./otrs-mcp
//!
//! # Or serve over HTTP
//! ./otrs-mcp --transport sse --host 0.0.0.0 --port 9000
//! ```
//!
//! ## Configuration
//!
//! Three environment variables are required:
//!
//! - `OTRS_BASE_URL`: Full URL of the OTRS REST web service endpoint
//! - `OTRS_USERNAME`: OTRS agent login
//! - `OTRS_PASSWORD`: OTRS agent password
//!
//! Optional:
//! - `OTRS_VERIFY_SSL`: Set to `false` to skip TLS certificate verification
//! - `OTRS_DEFAULT_QUEUE` / `OTRS_DEFAULT_STATE` / `OTRS_DEFAULT_PRIORITY`:
//!   Defaults applied when creating tickets
//! - `MCP_TRANSPORT`: `stdio`, `sse` or `streamable-http`
//! - `MCP_HTTP_HOST` / `MCP_SERVER_HOST` / `MCP_HOST`: Bind host for HTTP transports
//! - `MCP_HTTP_PORT` / `MCP_SERVER_PORT` / `MCP_PORT`: Bind port for HTTP transports
//! - `RUST_LOG`: Log level (e.g., `otrs_mcp=debug`)
//!
//! ## Security Considerations
//!
//! The OTRS password is stored only in memory and is:
//! - Never logged at any log level
//! - Sanitized from all error messages
//! - Masked in the startup configuration summary
//!
//! ## Example
//!
//! Using the [`OtrsClient`](otrs_client::OtrsClient) directly:
//!
//! ```ignore
//! use otrs_mcp::config::Config;
//! use otrs_mcp::otrs_client::{OtrsClient, SearchParams};
//!
//! async fn example() -> Result<(), otrs_mcp::error::OtrsError> {
//!     let config = Config::from_env()?;
//!     let client = OtrsClient::new(&config)?;
//!
//!     // Find open tickets in the Raw queue
//!     let params = SearchParams::new()
//!         .with_queue("Raw")
//!         .with_state("open")
//!         .with_limit(10);
//!
//!     for ticket_id in client.ticket_search(params).await? {
//!         let ticket = client.ticket_get(&ticket_id, false).await?;
//!         println!("#{}: {}", ticket.display_number(), ticket.display_title());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod otrs_client;
pub mod runtime;
pub mod server;
pub mod tools;
pub mod transport;
