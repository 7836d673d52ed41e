//! HTTP client for the OTRS Generic Interface REST web service.
//!
//! This module provides the `OtrsClient` struct for making authenticated
//! requests to an OTRS web service endpoint (the URL configured via
//! `OTRS_BASE_URL`, typically `.../nph-genericinterface.pl/Webservice/<name>`).
//!
//! # Authentication
//!
//! The Generic Interface has no session header; `UserLogin` and `Password`
//! travel with every operation - as query parameters for GET requests and
//! inside the JSON body for POST/PATCH. `SessionCreate` is still exposed
//! for clients that want a `SessionID` token.
//!
//! # Security
//!
//! The password is never logged. All error messages are sanitized before
//! logging.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};

use crate::config::Config;
use crate::error::OtrsError;
use crate::models::{
    ConfigItem, ConfigItemGetResponse, ConfigItemSearchResponse, ErrorEnvelope, NewArticle,
    SessionCreateResponse, Ticket, TicketGetResponse, TicketHistory, TicketHistoryResponse,
    TicketMutationResponse, TicketSearchResponse,
};
use crate::tools::{TicketCreateInput, TicketUpdateInput};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum length for HTTP error response bodies to avoid leaking verbose
/// OTRS internals.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Queue used for ticket creation when neither the caller nor
/// `OTRS_DEFAULT_QUEUE` names one.
const FALLBACK_QUEUE: &str = "Raw";

/// State used for ticket creation when neither the caller nor
/// `OTRS_DEFAULT_STATE` names one.
const FALLBACK_STATE: &str = "new";

/// Priority used for ticket creation when neither the caller nor
/// `OTRS_DEFAULT_PRIORITY` names one.
const FALLBACK_PRIORITY: &str = "3 normal";

/// HTTP client for the OTRS Generic Interface.
///
/// Handles authentication, request formatting and response parsing for
/// all supported web service operations.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = OtrsClient::new(&config)?;
///
/// let ticket = client.ticket_get("42", true).await?;
/// println!("#{}: {}", ticket.display_number(), ticket.display_title());
/// ```
#[derive(Clone)]
pub struct OtrsClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL of the web service endpoint, without trailing slash.
    base_url: String,

    /// OTRS agent login.
    username: String,

    /// OTRS agent password.
    /// SECURITY: Never log this value!
    password: String,

    /// Default queue for ticket creation.
    default_queue: Option<String>,

    /// Default state for ticket creation.
    default_state: Option<String>,

    /// Default priority for ticket creation.
    default_priority: Option<String>,
}

impl OtrsClient {
    /// Creates a new OTRS client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `OtrsError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, OtrsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(OtrsError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            default_queue: config.default_queue.clone(),
            default_state: config.default_state.clone(),
            default_priority: config.default_priority.clone(),
        })
    }

    /// Returns a reference to the password for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub(crate) fn password_for_sanitization(&self) -> &str {
        &self.password
    }

    /// Validates that an ID is a numeric string, as expected by OTRS.
    ///
    /// OTRS uses strictly numeric internal IDs. This prevents path
    /// traversal or injection via malformed IDs interpolated into URLs.
    fn validate_id(id: &str, field_name: &str) -> Result<(), OtrsError> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtrsError::validation(format!(
                "{} must be a numeric string, got: {:?}",
                field_name,
                id.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Returns the agent web URL for viewing a ticket in the OTRS UI.
    ///
    /// The web base is derived from the configured web service URL by
    /// cutting everything from `/nph-genericinterface.pl` onwards.
    pub fn ticket_web_url(&self, ticket_id: &str) -> String {
        let web_base = match self.base_url.find("/nph-genericinterface.pl") {
            Some(pos) => &self.base_url[..pos],
            None => self.base_url.as_str(),
        };
        format!(
            "{}/index.pl?Action=AgentTicketZoom;TicketID={}",
            web_base,
            urlencoding::encode(ticket_id)
        )
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Makes a GET request with credentials and extra query parameters.
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, OtrsError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(path = %path, "Making OTRS GET request");

        let mut pairs: Vec<(&str, String)> = vec![
            ("UserLogin", self.username.clone()),
            ("Password", self.password.clone()),
        ];
        pairs.extend_from_slice(query);

        let response = self
            .http
            .get(&url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, Method::GET, path))?;

        self.parse_response(response).await
    }

    /// Makes a POST/PATCH request with credentials merged into the JSON body.
    async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<T, OtrsError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(method = %method, path = %path, "Making OTRS request");

        let mut body = payload;
        if let serde_json::Value::Object(ref mut map) = body {
            map.insert(
                "UserLogin".to_string(),
                serde_json::Value::String(self.username.clone()),
            );
            map.insert(
                "Password".to_string(),
                serde_json::Value::String(self.password.clone()),
            );
        }

        let response = self
            .http
            .request(method.clone(), &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, method, path))?;

        self.parse_response(response).await
    }

    /// Maps a reqwest send error, detecting timeouts.
    fn map_send_error(&self, error: reqwest::Error, method: Method, path: &str) -> OtrsError {
        if error.is_timeout() {
            return OtrsError::timeout(
                Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                format!("{} {}", method, path),
            );
        }
        OtrsError::Http(error)
    }

    /// Parses a response, checking HTTP status and the OTRS error envelope.
    ///
    /// The Generic Interface reports most operation failures with an error
    /// envelope in the body - sometimes under HTTP 200, sometimes under
    /// HTTP 500 - so the envelope is checked on both paths.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, OtrsError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await.map_err(OtrsError::Http)?;

        tracing::trace!(status = %status, body = %body, "OTRS response");

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return Err(envelope.error.into_error());
        }

        if !status.is_success() {
            return Err(self.http_status_error(status, body));
        }

        serde_json::from_str(&body).map_err(OtrsError::Serialization)
    }

    /// Converts a non-success HTTP status into an OtrsError.
    fn http_status_error(&self, status: StatusCode, body: String) -> OtrsError {
        // Sanitize the body to ensure no password leakage
        let body = OtrsError::sanitize_message(&body, &self.password);
        // Truncate to avoid leaking verbose OTRS internals; localized error
        // pages are not ASCII, so the cut must land on a char boundary
        let body = if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...[truncated]", &body[..end])
        } else {
            body
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OtrsError::Authentication,
            StatusCode::NOT_FOUND => OtrsError::NotFound {
                id: "resource".to_string(),
            },
            _ => OtrsError::HttpStatus { status, body },
        }
    }

    // ========================================================================
    // Session operations
    // ========================================================================

    /// Creates a session and returns the `SessionID` token.
    ///
    /// Uses the configured credentials unless explicit overrides are given.
    pub async fn session_create(
        &self,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<String, OtrsError> {
        let payload = serde_json::json!({
            "UserLogin": user.unwrap_or(&self.username),
            "Password": password.unwrap_or(&self.password),
        });

        // send_json would overwrite the overrides with the configured
        // credentials, so this one posts directly.
        let url = format!("{}/Session", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, Method::POST, "/Session"))?;

        let session: SessionCreateResponse = self.parse_response(response).await?;
        Ok(session.session_id)
    }

    // ========================================================================
    // Ticket operations
    // ========================================================================

    /// Creates a new ticket with an initial article.
    ///
    /// Queue, state and priority fall back to the configured
    /// `OTRS_DEFAULT_*` values, then to the OTRS stock defaults.
    pub async fn ticket_create(
        &self,
        input: &TicketCreateInput,
    ) -> Result<TicketMutationResponse, OtrsError> {
        let queue = input
            .queue
            .as_deref()
            .or(self.default_queue.as_deref())
            .unwrap_or(FALLBACK_QUEUE);
        let state = input
            .state
            .as_deref()
            .or(self.default_state.as_deref())
            .unwrap_or(FALLBACK_STATE);
        let priority = input
            .priority
            .as_deref()
            .or(self.default_priority.as_deref())
            .unwrap_or(FALLBACK_PRIORITY);

        let mut ticket = serde_json::Map::new();
        ticket.insert("Title".to_string(), serde_json::json!(input.title));
        ticket.insert("Queue".to_string(), serde_json::json!(queue));
        ticket.insert("State".to_string(), serde_json::json!(state));
        ticket.insert("Priority".to_string(), serde_json::json!(priority));
        if let Some(ref customer) = input.customer_user {
            ticket.insert("CustomerUser".to_string(), serde_json::json!(customer));
        }
        if let Some(ref ticket_type) = input.ticket_type {
            ticket.insert("Type".to_string(), serde_json::json!(ticket_type));
        }

        let body = input.body.as_deref().unwrap_or(&input.title);
        let article = NewArticle::plain_text(&input.title, body);

        let payload = serde_json::json!({
            "Ticket": ticket,
            "Article": article,
        });

        self.send_json(Method::POST, "/Ticket", payload).await
    }

    /// Gets a single ticket, optionally with all of its articles.
    ///
    /// # Errors
    ///
    /// Returns `OtrsError::NotFound` if the ticket doesn't exist.
    pub async fn ticket_get(
        &self,
        ticket_id: &str,
        include_articles: bool,
    ) -> Result<Ticket, OtrsError> {
        Self::validate_id(ticket_id, "ticket_id")?;
        let path = format!("/Ticket/{}", ticket_id);

        let mut query = vec![("DynamicFields", "0".to_string())];
        if include_articles {
            query.push(("AllArticles", "1".to_string()));
        }

        let response: TicketGetResponse = self.get(&path, &query).await.map_err(|e| {
            // Convert generic NotFound to one with the specific ID
            if matches!(e, OtrsError::NotFound { .. }) {
                OtrsError::not_found(ticket_id)
            } else {
                e
            }
        })?;

        response
            .tickets
            .into_iter()
            .next()
            .ok_or_else(|| OtrsError::not_found(ticket_id))
    }

    /// Searches for tickets, returning matching ticket IDs.
    pub async fn ticket_search(&self, params: SearchParams) -> Result<Vec<String>, OtrsError> {
        let query = params.to_query_pairs();
        let response: TicketSearchResponse = self.get("/Ticket", &query).await?;
        Ok(response.ticket_ids)
    }

    /// Updates an existing ticket, optionally adding a note article.
    pub async fn ticket_update(
        &self,
        ticket_id: &str,
        input: &TicketUpdateInput,
    ) -> Result<TicketMutationResponse, OtrsError> {
        Self::validate_id(ticket_id, "ticket_id")?;

        let mut ticket = serde_json::Map::new();
        if let Some(ref title) = input.title {
            ticket.insert("Title".to_string(), serde_json::json!(title));
        }
        if let Some(ref queue) = input.queue {
            ticket.insert("Queue".to_string(), serde_json::json!(queue));
        }
        if let Some(ref state) = input.state {
            ticket.insert("State".to_string(), serde_json::json!(state));
        }
        if let Some(ref priority) = input.priority {
            ticket.insert("Priority".to_string(), serde_json::json!(priority));
        }
        if let Some(ref owner) = input.owner {
            ticket.insert("Owner".to_string(), serde_json::json!(owner));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("Ticket".to_string(), serde_json::Value::Object(ticket));
        if let Some(ref note) = input.note {
            let subject = input
                .title
                .clone()
                .unwrap_or_else(|| "Note".to_string());
            payload.insert(
                "Article".to_string(),
                serde_json::to_value(NewArticle::plain_text(subject, note))?,
            );
        }

        let path = format!("/Ticket/{}", ticket_id);
        self.send_json(Method::PATCH, &path, serde_json::Value::Object(payload))
            .await
    }

    /// Gets the change history of a ticket.
    pub async fn ticket_history(&self, ticket_id: &str) -> Result<TicketHistory, OtrsError> {
        Self::validate_id(ticket_id, "ticket_id")?;
        let path = format!("/TicketHistory/{}", ticket_id);

        let response: TicketHistoryResponse = self.get(&path, &[]).await.map_err(|e| {
            if matches!(e, OtrsError::NotFound { .. }) {
                OtrsError::not_found(ticket_id)
            } else {
                e
            }
        })?;

        response
            .ticket_history
            .into_iter()
            .next()
            .ok_or_else(|| OtrsError::not_found(ticket_id))
    }

    // ========================================================================
    // Config item operations
    // ========================================================================

    /// Gets a single configuration item.
    pub async fn config_item_get(&self, config_item_id: &str) -> Result<ConfigItem, OtrsError> {
        Self::validate_id(config_item_id, "config_item_id")?;
        let path = format!("/ConfigItem/{}", config_item_id);

        let response: ConfigItemGetResponse = self.get(&path, &[]).await.map_err(|e| {
            if matches!(e, OtrsError::NotFound { .. }) {
                OtrsError::not_found(config_item_id)
            } else {
                e
            }
        })?;

        response
            .config_items
            .into_iter()
            .next()
            .ok_or_else(|| OtrsError::not_found(config_item_id))
    }

    /// Searches for configuration items, returning matching IDs.
    pub async fn config_item_search(
        &self,
        params: ConfigItemSearchParams,
    ) -> Result<Vec<String>, OtrsError> {
        let payload = params.to_payload();
        let response: ConfigItemSearchResponse = self
            .send_json(Method::POST, "/ConfigItemSearch", payload)
            .await?;
        Ok(response.config_item_ids)
    }
}

/// Parameters for the `TicketSearch` operation.
///
/// Use the builder methods to construct filter criteria.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    queues: Vec<String>,
    states: Vec<String>,
    priorities: Vec<String>,
    title: Option<String>,
    customer_user: Option<String>,
    limit: Option<u32>,
}

impl SearchParams {
    /// Creates empty search parameters (matches all tickets).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by queue name (e.g. "Raw", "Postmaster").
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queues.push(queue.into());
        self
    }

    /// Filters by state name (e.g. "open", "closed successful").
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Filters by priority name (e.g. "3 normal").
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priorities.push(priority.into());
        self
    }

    /// Searches by title substring (wrapped in OTRS `%` wildcards).
    pub fn with_title_contains(mut self, title: impl Into<String>) -> Self {
        self.title = Some(format!("%{}%", title.into()));
        self
    }

    /// Filters by customer user login.
    pub fn with_customer_user(mut self, login: impl Into<String>) -> Self {
        self.customer_user = Some(login.into());
        self
    }

    /// Limits the number of returned ticket IDs.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Converts the parameters to query pairs for the search request.
    ///
    /// Repeated keys become arrays on the OTRS side.
    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for queue in &self.queues {
            pairs.push(("Queues", queue.clone()));
        }
        for state in &self.states {
            pairs.push(("States", state.clone()));
        }
        for priority in &self.priorities {
            pairs.push(("Priorities", priority.clone()));
        }
        if let Some(ref title) = self.title {
            pairs.push(("Title", title.clone()));
        }
        if let Some(ref login) = self.customer_user {
            pairs.push(("CustomerUserLogin", login.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("Limit", limit.to_string()));
        }
        pairs
    }
}

/// Parameters for the `ConfigItemSearch` operation.
#[derive(Debug, Clone, Default)]
pub struct ConfigItemSearchParams {
    class: Option<String>,
    name: Option<String>,
    depl_states: Vec<String>,
    limit: Option<u32>,
}

impl ConfigItemSearchParams {
    /// Creates empty search parameters (matches all config items).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by CI class (e.g. "Computer").
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Searches by CI name substring (wrapped in OTRS `%` wildcards).
    pub fn with_name_contains(mut self, name: impl Into<String>) -> Self {
        self.name = Some(format!("%{}%", name.into()));
        self
    }

    /// Filters by deployment state (e.g. "Production").
    pub fn with_depl_state(mut self, state: impl Into<String>) -> Self {
        self.depl_states.push(state.into());
        self
    }

    /// Limits the number of returned config item IDs.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Converts the parameters to the search request payload.
    fn to_payload(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        if let Some(ref class) = self.class {
            data.insert("Class".to_string(), serde_json::json!(class));
        }
        if let Some(ref name) = self.name {
            data.insert("Name".to_string(), serde_json::json!(name));
        }
        if !self.depl_states.is_empty() {
            data.insert("DeplStates".to_string(), serde_json::json!(self.depl_states));
        }
        if let Some(limit) = self.limit {
            data.insert("Limit".to_string(), serde_json::json!(limit));
        }
        serde_json::Value::Object(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates an OtrsClient for unit tests without requiring Config/env vars.
    fn test_client() -> OtrsClient {
        OtrsClient {
            http: Client::new(),
            base_url:
                "https://otrs.example.com/otrs/nph-genericinterface.pl/Webservice/GenericTicketConnectorREST"
                    .to_string(),
            username: "agent".to_string(),
            password: "test_pw".to_string(),
            default_queue: None,
            default_state: None,
            default_priority: None,
        }
    }

    #[test]
    fn test_validate_id_valid() {
        assert!(OtrsClient::validate_id("12345", "test").is_ok());
        assert!(OtrsClient::validate_id("0", "test").is_ok());
        assert!(OtrsClient::validate_id("999999999", "test").is_ok());
    }

    #[test]
    fn test_validate_id_rejects_empty() {
        let err = OtrsClient::validate_id("", "ticket_id").unwrap_err();
        assert!(err.to_string().contains("ticket_id"));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_validate_id_rejects_non_numeric() {
        assert!(OtrsClient::validate_id("abc", "id").is_err());
        assert!(OtrsClient::validate_id("123abc", "id").is_err());
        assert!(OtrsClient::validate_id("12/34", "id").is_err());
        assert!(OtrsClient::validate_id("../etc/passwd", "id").is_err());
        assert!(OtrsClient::validate_id("12 34", "id").is_err());
        assert!(OtrsClient::validate_id("-1", "id").is_err());
    }

    #[test]
    fn test_ticket_web_url_strips_webservice_path() {
        let client = test_client();
        let url = client.ticket_web_url("42");
        assert_eq!(
            url,
            "https://otrs.example.com/otrs/index.pl?Action=AgentTicketZoom;TicketID=42"
        );
    }

    #[test]
    fn test_ticket_web_url_encodes_id() {
        let client = test_client();
        let url = client.ticket_web_url("42&evil=true");
        assert!(!url.contains("&evil=true"));
        assert!(url.contains("TicketID=42%26evil%3Dtrue"));
    }

    #[test]
    fn test_http_status_error_truncates_multibyte_body() {
        // 600 bytes of two-byte characters; byte 500 is mid-character
        let client = test_client();
        let err = client.http_status_error(StatusCode::BAD_GATEWAY, "ä".repeat(300));
        let msg = err.to_string();
        assert!(msg.contains("...[truncated]"));
        assert!(msg.contains('ä'));
    }

    #[test]
    fn test_http_status_error_short_body_untouched() {
        let client = test_client();
        let err = client.http_status_error(StatusCode::BAD_GATEWAY, "bad gateway".to_string());
        assert!(err.to_string().contains("bad gateway"));
        assert!(!err.to_string().contains("[truncated]"));
    }

    #[test]
    fn test_search_params_query_pairs() {
        let params = SearchParams::new()
            .with_queue("Raw")
            .with_queue("Postmaster")
            .with_state("open")
            .with_title_contains("printer")
            .with_customer_user("jdoe")
            .with_limit(25);

        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("Queues", "Raw".to_string()),
                ("Queues", "Postmaster".to_string()),
                ("States", "open".to_string()),
                ("Title", "%printer%".to_string()),
                ("CustomerUserLogin", "jdoe".to_string()),
                ("Limit", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_empty() {
        assert!(SearchParams::new().to_query_pairs().is_empty());
    }

    #[test]
    fn test_config_item_search_payload() {
        let params = ConfigItemSearchParams::new()
            .with_class("Computer")
            .with_name_contains("print")
            .with_depl_state("Production")
            .with_limit(10);

        let payload = params.to_payload();
        assert_eq!(payload["Class"], "Computer");
        assert_eq!(payload["Name"], "%print%");
        assert_eq!(payload["DeplStates"][0], "Production");
        assert_eq!(payload["Limit"], 10);
    }

    #[test]
    fn test_config_item_search_payload_empty() {
        let payload = ConfigItemSearchParams::new().to_payload();
        assert_eq!(payload, serde_json::json!({}));
    }
}
