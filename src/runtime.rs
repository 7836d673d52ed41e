//! Runtime option resolution for the OTRS MCP server.
//!
//! Transport, host and port are resolved from command-line flags and
//! `MCP_*` environment variables with a fixed precedence:
//!
//! 1. Explicit CLI flag
//! 2. Environment variable (first non-empty name in the cascade)
//! 3. Built-in default
//!
//! Invalid values never abort startup: an unsupported transport or an
//! unparseable/out-of-range port is replaced by the default with a warning
//! on the diagnostic stream.

use std::env;
use std::fmt;

use crate::cli::Cli;

/// Default interface for HTTP transports.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default port for HTTP transports.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Environment variable naming the transport.
const TRANSPORT_ENV: &str = "MCP_TRANSPORT";

/// Host environment variable cascade, first non-empty wins.
const HOST_ENV_VARS: [&str; 3] = ["MCP_HTTP_HOST", "MCP_SERVER_HOST", "MCP_HOST"];

/// Port environment variable cascade, first non-empty wins.
const PORT_ENV_VARS: [&str; 3] = ["MCP_HTTP_PORT", "MCP_SERVER_PORT", "MCP_PORT"];

/// The wire mechanism the MCP server communicates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout, for subprocess launchers.
    Stdio,
    /// Server-Sent Events over HTTP.
    Sse,
    /// Streamable HTTP (bidirectional streaming over a single endpoint).
    StreamableHttp,
}

impl Transport {
    /// Parses a transport name, returning `None` for unsupported values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stdio" => Some(Transport::Stdio),
            "sse" => Some(Transport::Sse),
            "streamable-http" => Some(Transport::StreamableHttp),
            _ => None,
        }
    }

    /// The canonical name of this transport.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
            Transport::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved, immutable runtime settings.
///
/// Constructed once per process start via [`resolve`] and consumed exactly
/// once by [`crate::transport::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// The transport the server exposes.
    pub transport: Transport,
    /// Interface/IP for HTTP transports.
    pub host: String,
    /// Port for HTTP transports, always in `1..=65535`.
    pub port: u16,
}

/// Resolves runtime options from CLI flags and the process environment.
pub fn resolve(cli: &Cli) -> RuntimeOptions {
    resolve_with(cli, |name| env::var(name).ok())
}

/// Resolves runtime options against an arbitrary environment lookup.
///
/// Separated from [`resolve`] so tests can supply an environment without
/// mutating process state.
pub fn resolve_with<F>(cli: &Cli, lookup: F) -> RuntimeOptions
where
    F: Fn(&str) -> Option<String>,
{
    let raw_transport = cli
        .transport
        .clone()
        .or_else(|| lookup(TRANSPORT_ENV).filter(|v| !v.is_empty()));

    let transport = match raw_transport {
        None => Transport::Stdio,
        Some(raw) => Transport::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(
                transport = %raw,
                "Unsupported MCP transport, falling back to 'stdio'"
            );
            Transport::Stdio
        }),
    };

    let host = cli
        .host
        .clone()
        .or_else(|| first_env(&HOST_ENV_VARS, &lookup))
        .unwrap_or_else(|| DEFAULT_HTTP_HOST.to_string());

    let port = match cli.port {
        Some(raw) => check_port_range(raw),
        None => parse_port(first_env(&PORT_ENV_VARS, &lookup).as_deref()),
    };

    RuntimeOptions {
        transport,
        host,
        port,
    }
}

/// Returns the first non-empty value among the named environment variables.
fn first_env<F>(names: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
}

/// Parses a raw port value, falling back to the default with a warning.
///
/// `None` (no variable set) resolves to the default silently; an
/// unparseable or out-of-range value warns first.
fn parse_port(value: Option<&str>) -> u16 {
    let Some(raw) = value else {
        return DEFAULT_HTTP_PORT;
    };
    match raw.parse::<i64>() {
        Ok(port) => check_port_range(port),
        Err(_) => {
            tracing::warn!(
                port = %raw,
                fallback = DEFAULT_HTTP_PORT,
                "Invalid MCP port, falling back to default"
            );
            DEFAULT_HTTP_PORT
        }
    }
}

/// Range-checks a numeric port, falling back to the default with a warning.
fn check_port_range(port: i64) -> u16 {
    if (1..=65535).contains(&port) {
        port as u16
    } else {
        tracing::warn!(
            port = port,
            fallback = DEFAULT_HTTP_PORT,
            "MCP port out of range, falling back to default"
        );
        DEFAULT_HTTP_PORT
    }
}

/// Prints the startup banner to stdout.
///
/// Lists the transport mode, the listen address for HTTP transports and the
/// fixed catalogue of supported operations.
pub fn print_startup_banner(options: &RuntimeOptions) {
    println!("\n[START] Starting OTRS MCP Server...");
    println!(
        "[MODE] Running server with '{}' transport...",
        options.transport
    );
    if options.transport != Transport::Stdio {
        println!("[LISTEN] Interface {}:{}", options.host, options.port);
    }
    println!(
        "[OPS] Available operations: SessionCreate, TicketCreate, TicketGet, TicketSearch, \
         TicketUpdate, TicketHistoryGet, ConfigItemGet, ConfigItemSearch"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve_env(cli: &Cli, vars: &HashMap<String, String>) -> RuntimeOptions {
        resolve_with(cli, |name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let options = resolve_env(&Cli::default(), &env(&[]));
        assert_eq!(options.transport, Transport::Stdio);
        assert_eq!(options.host, "127.0.0.1");
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_all_supported_transports_resolve_exactly() {
        for name in ["stdio", "sse", "streamable-http"] {
            let cli = Cli {
                transport: Some(name.to_string()),
                ..Cli::default()
            };
            let options = resolve_env(&cli, &env(&[]));
            assert_eq!(options.transport.as_str(), name);
        }
    }

    #[test]
    fn test_unsupported_transport_falls_back_to_stdio() {
        let cli = Cli {
            transport: Some("websocket".to_string()),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &env(&[]));
        assert_eq!(options.transport, Transport::Stdio);
    }

    #[test]
    fn test_unsupported_transport_from_env_falls_back_to_stdio() {
        let vars = env(&[("MCP_TRANSPORT", "grpc")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.transport, Transport::Stdio);
    }

    #[test]
    fn test_empty_transport_env_is_ignored() {
        let vars = env(&[("MCP_TRANSPORT", "")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.transport, Transport::Stdio);
    }

    #[test]
    fn test_cli_transport_overrides_env() {
        let vars = env(&[("MCP_TRANSPORT", "sse")]);
        let cli = Cli {
            transport: Some("streamable-http".to_string()),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &vars);
        assert_eq!(options.transport, Transport::StreamableHttp);
    }

    #[test]
    fn test_transport_and_port_from_env() {
        let vars = env(&[("MCP_TRANSPORT", "sse"), ("MCP_PORT", "9999")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.transport, Transport::Sse);
        assert_eq!(options.host, "127.0.0.1");
        assert_eq!(options.port, 9999);
    }

    #[test]
    fn test_host_env_cascade_order() {
        let vars = env(&[
            ("MCP_SERVER_HOST", "10.0.0.2"),
            ("MCP_HOST", "10.0.0.3"),
        ]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.host, "10.0.0.2");

        let vars = env(&[
            ("MCP_HTTP_HOST", "10.0.0.1"),
            ("MCP_SERVER_HOST", "10.0.0.2"),
        ]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.host, "10.0.0.1");
    }

    #[test]
    fn test_host_cascade_skips_empty_values() {
        let vars = env(&[("MCP_HTTP_HOST", ""), ("MCP_HOST", "0.0.0.0")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.host, "0.0.0.0");
    }

    #[test]
    fn test_cli_host_overrides_env_cascade() {
        let vars = env(&[("MCP_HTTP_HOST", "10.0.0.1")]);
        let cli = Cli {
            host: Some("192.168.1.5".to_string()),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &vars);
        assert_eq!(options.host, "192.168.1.5");
    }

    #[test]
    fn test_port_env_cascade_order() {
        let vars = env(&[("MCP_SERVER_PORT", "9001"), ("MCP_PORT", "9002")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.port, 9001);
    }

    #[test]
    fn test_cli_port_overrides_env() {
        let vars = env(&[("MCP_HTTP_PORT", "9001")]);
        let cli = Cli {
            port: Some(3333),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &vars);
        assert_eq!(options.port, 3333);
    }

    #[test]
    fn test_port_boundaries() {
        for port in [1i64, 65535] {
            let cli = Cli {
                port: Some(port),
                ..Cli::default()
            };
            let options = resolve_env(&cli, &env(&[]));
            assert_eq!(options.port as i64, port);
        }
    }

    #[test]
    fn test_port_zero_falls_back() {
        let cli = Cli {
            port: Some(0),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &env(&[]));
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_negative_port_falls_back() {
        let cli = Cli {
            port: Some(-1),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &env(&[]));
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_port_above_range_falls_back() {
        let cli = Cli {
            port: Some(70000),
            ..Cli::default()
        };
        let options = resolve_env(&cli, &env(&[]));
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_non_numeric_port_env_falls_back() {
        let vars = env(&[("MCP_PORT", "eighty")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_empty_port_env_uses_default_silently() {
        let vars = env(&[("MCP_HTTP_PORT", "")]);
        let options = resolve_env(&Cli::default(), &vars);
        assert_eq!(options.port, 8000);
    }

    #[test]
    fn test_transport_parse_round_trip() {
        for transport in [Transport::Stdio, Transport::Sse, Transport::StreamableHttp] {
            assert_eq!(Transport::parse(transport.as_str()), Some(transport));
        }
        assert_eq!(Transport::parse("STDIO"), None);
        assert_eq!(Transport::parse(""), None);
    }
}
