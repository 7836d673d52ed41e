//! Common types shared across OTRS Generic Interface models.
//!
//! This module defines the error envelope and the ID helpers used by
//! multiple web service operations.

use serde::{Deserialize, Deserializer};

use crate::error::OtrsError;

/// The error block OTRS embeds in a response body when an operation fails.
///
/// The Generic Interface reports operation failures inside an HTTP 200
/// response, so every response body has to be checked for this envelope
/// before the payload is deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// The error detail block.
    #[serde(rename = "Error")]
    pub error: ErrorDetail,
}

/// Error code and message from an OTRS error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    /// Dotted operation error code, e.g. `TicketGet.NotFound`.
    #[serde(rename = "ErrorCode")]
    pub code: String,

    /// Human-readable error message.
    #[serde(rename = "ErrorMessage", default)]
    pub message: String,
}

impl ErrorDetail {
    /// Converts the envelope into the crate error type.
    pub fn into_error(self) -> OtrsError {
        OtrsError::from_envelope(self.code, self.message)
    }
}

/// An untagged ID value; OTRS emits IDs as numbers or strings depending
/// on the operation and the server version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdValue {
    /// Numeric form.
    Num(i64),
    /// String form.
    Str(String),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Num(n) => n.to_string(),
            IdValue::Str(s) => s,
        }
    }
}

/// Deserializes an ID that may arrive as a number or a string.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdValue::deserialize(deserializer).map(IdValue::into_string)
}

/// Deserializes an optional ID that may arrive as a number or a string.
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdValue>::deserialize(deserializer).map(|v| v.map(IdValue::into_string))
}

/// Deserializes a list of IDs that may arrive as numbers or strings.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<IdValue>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(IdValue::into_string)
        .collect())
}

/// Response payload for the `SessionCreate` operation.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreateResponse {
    /// The created session token.
    #[serde(rename = "SessionID")]
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_deserializes() {
        let body = r#"{"Error":{"ErrorCode":"TicketGet.NotFound","ErrorMessage":"No ticket"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, "TicketGet.NotFound");
        assert_eq!(envelope.error.message, "No ticket");
    }

    #[test]
    fn test_error_envelope_without_message() {
        let body = r#"{"Error":{"ErrorCode":"SessionCreate.AuthFail"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, "SessionCreate.AuthFail");
        assert!(envelope.error.message.is_empty());
    }

    #[derive(Debug, serde::Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn test_id_from_number() {
        let holder: IdHolder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(holder.id, "42");
    }

    #[test]
    fn test_id_from_string() {
        let holder: IdHolder = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(holder.id, "42");
    }

    #[derive(Debug, serde::Deserialize)]
    struct IdListHolder {
        #[serde(deserialize_with = "deserialize_id_list", default)]
        ids: Vec<String>,
    }

    #[test]
    fn test_id_list_mixed() {
        let holder: IdListHolder = serde_json::from_str(r#"{"ids": [1, "2", 3]}"#).unwrap();
        assert_eq!(holder.ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_id_list_null() {
        let holder: IdListHolder = serde_json::from_str(r#"{"ids": null}"#).unwrap();
        assert!(holder.ids.is_empty());
    }

    #[test]
    fn test_session_response() {
        let response: SessionCreateResponse =
            serde_json::from_str(r#"{"SessionID":"abc123token"}"#).unwrap();
        assert_eq!(response.session_id, "abc123token");
    }
}
