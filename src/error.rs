//! Error types for the OTRS MCP server.
//!
//! This module defines `OtrsError`, the unified error type used throughout
//! the application for consistent error handling and propagation.
//!
//! # Security
//!
//! All error messages are sanitized to ensure the OTRS password is never
//! leaked in logs or error responses. Use `sanitize_message()` when
//! constructing error messages from external sources.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all OTRS MCP operations.
///
/// Each variant provides specific context about the failure, enabling
/// meaningful error messages without leaking sensitive information
/// like the OTRS password.
#[derive(Error, Debug)]
pub enum OtrsError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// The OTRS Generic Interface returned an error envelope.
    #[error("OTRS error {code}: {message}")]
    Api {
        /// OTRS error code, e.g. `TicketGet.AccessDenied`.
        code: String,
        /// Human-readable error message from OTRS.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested resource was not found.
    #[error("resource not found: {id}")]
    NotFound {
        /// The ID of the resource that was not found.
        id: String,
    },

    /// Authentication failed - likely wrong credentials.
    #[error("authentication failed - check OTRS_USERNAME and OTRS_PASSWORD")]
    Authentication,

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl OtrsError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        OtrsError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        OtrsError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        OtrsError::Validation(message.into())
    }

    /// Creates a not found error for a ticket or config item ID.
    pub fn not_found(id: impl Into<String>) -> Self {
        OtrsError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        OtrsError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates an error from an OTRS error envelope.
    ///
    /// Auth failure codes (e.g. `SessionCreate.AuthFail`,
    /// `TicketGet.AccessDenied`) are mapped to `OtrsError::Authentication`
    /// so callers get an actionable message instead of the raw envelope.
    pub fn from_envelope(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        if code.ends_with(".AuthFail") || code.ends_with(".AccessDenied") {
            return OtrsError::Authentication;
        }
        OtrsError::Api {
            code,
            message: message.into(),
        }
    }

    /// Sanitizes an error message to remove any occurrence of the password.
    ///
    /// This is critical for security - the OTRS password must never appear
    /// in logs, error messages, or responses to users.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `password` - The password to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the password replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, password: &str) -> String {
        if password.is_empty() {
            return message.to_string();
        }
        message.replace(password, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    ///
    /// Use this when you need to include error details in logs or responses
    /// and want to ensure no sensitive data is leaked.
    #[must_use]
    pub fn sanitized_display(&self, password: &str) -> String {
        Self::sanitize_message(&self.to_string(), password)
    }
}
