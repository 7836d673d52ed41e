//! Command-line flags for the OTRS MCP server.
//!
//! Flags take precedence over the `MCP_*` environment variables; see
//! [`crate::runtime::resolve`] for the full precedence rules.

use clap::Parser;

/// Runtime options for the OTRS MCP server.
#[derive(Debug, Clone, Default, Parser)]
#[command(author, version, about = "MCP server for OTRS help desk ticketing")]
pub struct Cli {
    /// Transport protocol to expose: stdio, sse or streamable-http
    /// (default: stdio or MCP_TRANSPORT env).
    ///
    /// Unsupported values fall back to stdio with a warning rather than
    /// aborting, so a misconfigured launcher still gets a usable server.
    #[arg(long)]
    pub transport: Option<String>,

    /// Interface/IP for HTTP transports (default: 127.0.0.1 or MCP_* env).
    #[arg(long)]
    pub host: Option<String>,

    /// Port for HTTP transports (default: 8000 or MCP_* env).
    ///
    /// Out-of-range values fall back to the default with a warning.
    #[arg(long)]
    pub port: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::parse_from(["otrs-mcp"]);
        assert!(cli.transport.is_none());
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "otrs-mcp",
            "--transport",
            "sse",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
        ]);
        assert_eq!(cli.transport.as_deref(), Some("sse"));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
    }

    #[test]
    fn test_out_of_range_port_is_accepted_by_clap() {
        // Range validation happens during resolution, not parsing, so the
        // warn-and-default path is reachable from the CLI as well.
        let cli = Cli::parse_from(["otrs-mcp", "--port", "70000"]);
        assert_eq!(cli.port, Some(70000));
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let result = Cli::try_parse_from(["otrs-mcp", "--port", "eighty"]);
        assert!(result.is_err());
    }
}
