//! Configuration management for the OTRS MCP server.
//!
//! This module handles loading OTRS credentials from environment variables
//! and printing the startup configuration summary. Required variables are
//! validated before the server runtime is started; missing credentials are
//! fatal.

use std::env;

use url::Url;

use crate::error::OtrsError;
use crate::runtime::{RuntimeOptions, Transport};

/// Environment variables that must be set before the server starts.
pub const REQUIRED_ENV_VARS: [&str; 3] = ["OTRS_BASE_URL", "OTRS_USERNAME", "OTRS_PASSWORD"];

/// Optional environment variables, shown in the summary with a
/// `"default"` placeholder when unset.
pub const OPTIONAL_ENV_VARS: [&str; 4] = [
    "OTRS_VERIFY_SSL",
    "OTRS_DEFAULT_QUEUE",
    "OTRS_DEFAULT_STATE",
    "OTRS_DEFAULT_PRIORITY",
];

/// Configuration for connecting to the OTRS Generic Interface.
///
/// The password is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the OTRS web service endpoint, e.g.
    /// `https://otrs.example.com/otrs/nph-genericinterface.pl/Webservice/GenericTicketConnectorREST`.
    pub base_url: String,

    /// OTRS agent login used for authentication.
    pub username: String,

    /// OTRS agent password.
    /// This value must never be logged or included in error messages.
    pub password: String,

    /// Whether to verify the server TLS certificate (default: true).
    /// Set `OTRS_VERIFY_SSL=false` for self-signed certificates.
    pub verify_ssl: bool,

    /// Queue used for ticket creation when the caller does not name one.
    pub default_queue: Option<String>,

    /// State used for ticket creation when the caller does not name one.
    pub default_state: Option<String>,

    /// Priority used for ticket creation when the caller does not name one.
    pub default_priority: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `OTRS_BASE_URL`: Base URL of the OTRS web service endpoint
    /// - `OTRS_USERNAME`: Agent login
    /// - `OTRS_PASSWORD`: Agent password
    ///
    /// # Errors
    ///
    /// Returns `OtrsError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, OtrsError> {
        let base_url = Self::get_required_env("OTRS_BASE_URL")?;
        let username = Self::get_required_env("OTRS_USERNAME")?;
        let password = Self::get_required_env("OTRS_PASSWORD")?;

        let base_url = Self::validate_base_url(base_url)?;
        let verify_ssl = Self::parse_verify_ssl(env::var("OTRS_VERIFY_SSL").ok().as_deref());

        Ok(Config {
            base_url,
            username,
            password,
            verify_ssl,
            default_queue: non_empty(env::var("OTRS_DEFAULT_QUEUE").ok()),
            default_state: non_empty(env::var("OTRS_DEFAULT_STATE").ok()),
            default_priority: non_empty(env::var("OTRS_DEFAULT_PRIORITY").ok()),
        })
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, OtrsError> {
        env::var(name)
            .map_err(|_| OtrsError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(OtrsError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, OtrsError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(OtrsError::invalid_config(
                "OTRS_BASE_URL must start with http:// or https://",
            ));
        }

        Url::parse(&url)
            .map_err(|e| OtrsError::invalid_config(format!("OTRS_BASE_URL is not a valid URL: {}", e)))?;

        Ok(url)
    }

    /// Parses the `OTRS_VERIFY_SSL` flag; anything but an explicit "off"
    /// value keeps verification enabled.
    fn parse_verify_ssl(value: Option<&str>) -> bool {
        match value {
            Some(raw) => !matches!(
                raw.trim().to_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
            None => true,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The environment/configuration summary printed at startup.
///
/// Built against an injectable environment lookup so the rendering logic
/// stays testable without touching process state.
pub struct EnvReport {
    /// The human-readable summary text.
    pub summary: String,
    /// Required variables that are missing or empty.
    pub missing: Vec<&'static str>,
}

impl EnvReport {
    /// Returns true when all required variables are present.
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validates the environment and prints the configuration summary to stdout.
///
/// The full summary (credentials masked, optional variables, resolved
/// runtime settings) prints regardless of the outcome; on failure the
/// missing variables and remediation instructions are included. Returns
/// false when any required variable is missing - the caller must then exit
/// without starting the server runtime.
pub fn validate_environment(options: &RuntimeOptions) -> bool {
    let report = build_report(options, |name| env::var(name).ok());
    print!("{}", report.summary);
    report.is_valid()
}

/// Builds the configuration summary against the given environment lookup.
pub fn build_report<F>(options: &RuntimeOptions, lookup: F) -> EnvReport
where
    F: Fn(&str) -> Option<String>,
{
    let mut summary = String::from("[CONFIG] OTRS MCP Server Configuration:\n");
    let mut missing = Vec::new();

    for var in REQUIRED_ENV_VARS {
        match lookup(var).filter(|v| !v.is_empty()) {
            Some(value) => {
                summary.push_str(&format!("  {}: {}\n", var, mask_value(var, &value)));
            }
            None => missing.push(var),
        }
    }

    if !missing.is_empty() {
        summary.push_str(&format!(
            "[ERROR] Missing required environment variables: {}\n",
            missing.join(", ")
        ));
        summary.push_str("\n[INFO] Set these environment variables:\n");
        summary.push_str(
            "  export OTRS_BASE_URL='https://your-otrs-server/otrs/nph-genericinterface.pl/Webservice/GenericTicketConnectorREST'\n",
        );
        summary.push_str("  export OTRS_USERNAME='your-username'\n");
        summary.push_str("  export OTRS_PASSWORD='your-password'\n");
        summary.push_str(
            "  export OTRS_VERIFY_SSL='false'  # Optional, for self-signed certificates\n",
        );
    }

    for var in OPTIONAL_ENV_VARS {
        let value = lookup(var)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "default".to_string());
        summary.push_str(&format!("  {}: {}\n", var, value));
    }

    summary.push_str("\n[CONFIG] MCP Runtime Settings:\n");
    summary.push_str(&format!("  MCP_TRANSPORT: {}\n", options.transport));
    summary.push_str(&format!("  MCP_HOST: {}\n", options.host));
    summary.push_str(&format!("  MCP_PORT: {}\n", options.port));
    if options.transport == Transport::Stdio {
        summary.push_str("  (host/port affect HTTP transports only)\n");
    }

    EnvReport { summary, missing }
}

/// Masks password-like values, preserving the raw value's length.
fn mask_value(name: &str, value: &str) -> String {
    if name.contains("PASSWORD") {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Note: tests that would modify process environment variables are
    // deliberately avoided; everything below goes through injected lookups.

    fn options() -> RuntimeOptions {
        RuntimeOptions {
            transport: Transport::Stdio,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("OTRS_BASE_URL", "https://otrs.example.com/otrs/nph-genericinterface.pl/Webservice/GenericTicketConnectorREST"),
            ("OTRS_USERNAME", "agent"),
            ("OTRS_PASSWORD", "hunter2"),
        ])
    }

    fn report(vars: &HashMap<String, String>) -> EnvReport {
        build_report(&options(), |name| vars.get(name).cloned())
    }

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result = Config::validate_base_url("https://example.com/".to_string()).unwrap();
        assert_eq!(result, "https://example.com");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        let result = Config::validate_base_url("otrs.example.com".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_base_url_rejects_garbage() {
        let result = Config::validate_base_url("https://".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_verify_ssl_defaults_to_true() {
        assert!(Config::parse_verify_ssl(None));
        assert!(Config::parse_verify_ssl(Some("true")));
        assert!(Config::parse_verify_ssl(Some("anything")));
    }

    #[test]
    fn test_parse_verify_ssl_off_values() {
        assert!(!Config::parse_verify_ssl(Some("false")));
        assert!(!Config::parse_verify_ssl(Some("FALSE")));
        assert!(!Config::parse_verify_ssl(Some("0")));
        assert!(!Config::parse_verify_ssl(Some("no")));
        assert!(!Config::parse_verify_ssl(Some(" off ")));
    }

    #[test]
    fn test_report_valid_when_all_required_present() {
        let report = report(&full_env());
        assert!(report.is_valid());
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_report_masks_password_with_matching_length() {
        let report = report(&full_env());
        assert!(report.summary.contains("OTRS_PASSWORD: *******"));
        assert!(!report.summary.contains("hunter2"));
    }

    #[test]
    fn test_report_shows_username_unmasked() {
        let report = report(&full_env());
        assert!(report.summary.contains("OTRS_USERNAME: agent"));
    }

    #[test]
    fn test_report_missing_password() {
        let mut vars = full_env();
        vars.remove("OTRS_PASSWORD");
        let report = report(&vars);
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["OTRS_PASSWORD"]);
        assert!(report.summary.contains("Missing required environment variables: OTRS_PASSWORD"));
        assert!(report.summary.contains("export OTRS_PASSWORD="));
    }

    #[test]
    fn test_report_empty_value_counts_as_missing() {
        let mut vars = full_env();
        vars.insert("OTRS_USERNAME".to_string(), String::new());
        let report = report(&vars);
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["OTRS_USERNAME"]);
    }

    #[test]
    fn test_report_lists_all_missing() {
        let report = report(&env(&[]));
        assert_eq!(
            report.missing,
            vec!["OTRS_BASE_URL", "OTRS_USERNAME", "OTRS_PASSWORD"]
        );
    }

    #[test]
    fn test_report_optional_vars_default_placeholder() {
        let report = report(&full_env());
        assert!(report.summary.contains("OTRS_VERIFY_SSL: default"));
        assert!(report.summary.contains("OTRS_DEFAULT_QUEUE: default"));
    }

    #[test]
    fn test_report_optional_vars_show_values() {
        let mut vars = full_env();
        vars.insert("OTRS_DEFAULT_QUEUE".to_string(), "Raw".to_string());
        let report = report(&vars);
        assert!(report.summary.contains("OTRS_DEFAULT_QUEUE: Raw"));
    }

    #[test]
    fn test_report_prints_runtime_settings_even_when_invalid() {
        let report = report(&env(&[]));
        assert!(report.summary.contains("MCP_TRANSPORT: stdio"));
        assert!(report.summary.contains("MCP_HOST: 127.0.0.1"));
        assert!(report.summary.contains("MCP_PORT: 8000"));
    }

    #[test]
    fn test_report_stdio_note() {
        let report = report(&full_env());
        assert!(report.summary.contains("(host/port affect HTTP transports only)"));
    }

    #[test]
    fn test_report_no_stdio_note_for_http_transports() {
        let options = RuntimeOptions {
            transport: Transport::Sse,
            host: "0.0.0.0".to_string(),
            port: 9000,
        };
        let vars = full_env();
        let report = build_report(&options, |name| vars.get(name).cloned());
        assert!(!report.summary.contains("(host/port affect HTTP transports only)"));
        assert!(report.summary.contains("MCP_TRANSPORT: sse"));
        assert!(report.summary.contains("MCP_PORT: 9000"));
    }

    #[test]
    fn test_mask_value_multibyte_password() {
        // Mask length counts characters, not bytes.
        assert_eq!(mask_value("OTRS_PASSWORD", "pæssword"), "********");
    }
}
