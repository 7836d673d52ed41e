//! Transport layer for serving the MCP server.
//!
//! Three transports are supported: stdio for subprocess use by MCP
//! clients, SSE for legacy HTTP clients, and streamable HTTP (the
//! current MCP HTTP transport, mounted at `/mcp`).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use rmcp::transport::sse_server::SseServer;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;

use crate::runtime::{RuntimeOptions, Transport};
use crate::server::OtrsServer;

/// Serves the MCP server over the transport selected at startup.
///
/// Blocks until the client disconnects (stdio) or Ctrl+C is received
/// (HTTP transports).
pub async fn run(server: OtrsServer, options: &RuntimeOptions) -> Result<()> {
    match options.transport {
        Transport::Stdio => run_stdio(server).await,
        Transport::Sse => run_sse(server, options.host.as_str(), options.port).await,
        Transport::StreamableHttp => {
            run_streamable_http(server, options.host.as_str(), options.port).await
        }
    }
}

/// Runs the MCP server over STDIN/STDOUT.
///
/// This mode is used when the server is launched as a subprocess by an
/// MCP client. Nothing but protocol frames may be written to stdout
/// once this starts.
async fn run_stdio(server: OtrsServer) -> Result<()> {
    tracing::info!("Serving MCP over stdio");

    let service = server
        .serve(stdio())
        .await
        .context("failed to start stdio transport")?;

    service.waiting().await?;
    Ok(())
}

/// Runs the MCP server over SSE, bound to the given host and port.
///
/// Waits for Ctrl+C, then cancels the server for a graceful shutdown.
async fn run_sse(server: OtrsServer, host: &str, port: u16) -> Result<()> {
    let addr = resolve_bind_addr(host, port).await?;
    tracing::info!(%addr, "Serving MCP over SSE");

    let sse_server = SseServer::serve(addr)
        .await
        .with_context(|| format!("failed to bind SSE server to {}", addr))?;

    let cancellation_token = sse_server.with_service(move || server.clone());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down SSE server");
    cancellation_token.cancel();

    Ok(())
}

/// Runs the MCP server over streamable HTTP, mounted at `/mcp`.
async fn run_streamable_http(server: OtrsServer, host: &str, port: u16) -> Result<()> {
    let addr = resolve_bind_addr(host, port).await?;
    tracing::info!(%addr, "Serving MCP over streamable HTTP at /mcp");

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let app = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down streamable HTTP server");
        })
        .await?;

    Ok(())
}

/// Resolves a host/port pair to a socket address.
///
/// Accepts both IP literals and hostnames such as "localhost".
async fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("failed to resolve bind address {}:{}", host, port))?
        .next()
        .with_context(|| format!("no addresses for {}:{}", host, port))
}
