//! MCP server implementation for the OTRS MCP server.
//!
//! This module defines the `OtrsServer` struct that implements the MCP
//! `ServerHandler` trait, exposing OTRS ticketing operations as tools.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};

use crate::models::{ConfigItem, Ticket, TicketHistory, TicketMutationResponse};
use crate::otrs_client::{ConfigItemSearchParams, OtrsClient, SearchParams};
use crate::tools::{
    ConfigItemGetInput, ConfigItemSearchInput, SessionCreateInput, TicketCreateInput,
    TicketGetInput, TicketHistoryInput, TicketSearchInput, TicketUpdateInput,
};

/// The OTRS MCP server.
///
/// This server exposes OTRS ticketing and config item operations as MCP
/// tools.
#[derive(Clone)]
pub struct OtrsServer {
    /// OTRS client for web service operations.
    otrs_client: OtrsClient,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl OtrsServer {
    /// Creates a new OTRS server instance.
    ///
    /// # Arguments
    ///
    /// * `otrs_client` - The OTRS client for web service operations
    pub fn new(otrs_client: OtrsClient) -> Self {
        Self {
            otrs_client,
            tool_router: Self::tool_router(),
        }
    }

    /// A simple ping tool to verify the server is running.
    ///
    /// Returns "pong" on success.
    #[tool(description = "Test connectivity to the OTRS MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// Create an OTRS session and return its SessionID token.
    #[tool(description = "Create an OTRS session. Uses the configured agent credentials unless user/password overrides are given. Returns the SessionID token.")]
    async fn session_create(
        &self,
        Parameters(input): Parameters<SessionCreateInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(user = ?input.user, "session_create tool called");

        let session_id = self
            .otrs_client
            .session_create(input.user.as_deref(), input.password.as_deref())
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to create session");
                format!("Failed to create session: {}", sanitized)
            })?;

        Ok(format!("Session created.\nSessionID: {}", session_id))
    }

    /// Create a new ticket with an initial article.
    ///
    /// Title is required. Returns the created ticket's ID and number.
    #[tool(description = "Create a new OTRS ticket. Title is required; queue, state, priority and customer_user are optional and fall back to configured defaults. Returns the created ticket's ID and number.")]
    async fn ticket_create(
        &self,
        Parameters(input): Parameters<TicketCreateInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(title = %input.title, "ticket_create tool called");

        if input.title.is_empty() {
            return Err("Title is required and cannot be empty.".to_string());
        }

        let created = self.otrs_client.ticket_create(&input).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to create ticket");
            format!("Failed to create ticket: {}", sanitized)
        })?;

        Ok(format_create_result(
            &created,
            &self.otrs_client.ticket_web_url(&created.ticket_id),
        ))
    }

    /// Get full details of a single ticket.
    #[tool(description = "Get full details of a single OTRS ticket, including its articles by default.")]
    async fn ticket_get(
        &self,
        Parameters(input): Parameters<TicketGetInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = %input.ticket_id, "ticket_get tool called");

        let include_articles = input.include_articles.unwrap_or(true);
        let ticket = self
            .otrs_client
            .ticket_get(&input.ticket_id, include_articles)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = %input.ticket_id, "Failed to get ticket");
                format!("Failed to get ticket {}: {}", input.ticket_id, sanitized)
            })?;

        Ok(format_ticket_details(
            &ticket,
            &self.otrs_client.ticket_web_url(&ticket.ticket_id),
        ))
    }

    /// Search for tickets matching the given filters.
    #[tool(description = "Search OTRS tickets by queue, state, priority, title substring or customer user. Returns matching ticket IDs; use ticket_get for details.")]
    async fn ticket_search(
        &self,
        Parameters(input): Parameters<TicketSearchInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "ticket_search tool called");

        let mut params = SearchParams::new();
        if let Some(queue) = input.queue {
            params = params.with_queue(queue);
        }
        if let Some(state) = input.state {
            params = params.with_state(state);
        }
        if let Some(priority) = input.priority {
            params = params.with_priority(priority);
        }
        if let Some(title) = input.title_contains {
            params = params.with_title_contains(title);
        }
        if let Some(customer) = input.customer_user {
            params = params.with_customer_user(customer);
        }

        let limit = input.limit.unwrap_or(20).min(100);
        params = params.with_limit(limit);

        let ticket_ids = self.otrs_client.ticket_search(params).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to search tickets");
            format!("Failed to search tickets: {}", sanitized)
        })?;

        Ok(format_search_results(&ticket_ids))
    }

    /// Update a ticket's properties and/or add a note.
    ///
    /// Ticket ID is required. At least one field must be provided.
    #[tool(description = "Update an OTRS ticket's title, queue, state, priority or owner, and/or attach a note article. Ticket ID is required.")]
    async fn ticket_update(
        &self,
        Parameters(input): Parameters<TicketUpdateInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = %input.ticket_id, "ticket_update tool called");

        if !input.has_updates() {
            return Err(
                "At least one field must be provided for update (title, queue, state, priority, owner or note)."
                    .to_string(),
            );
        }

        let updated = self
            .otrs_client
            .ticket_update(&input.ticket_id, &input)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = %input.ticket_id, "Failed to update ticket");
                format!("Failed to update ticket {}: {}", input.ticket_id, sanitized)
            })?;

        Ok(format_update_result(&updated, input.note.is_some()))
    }

    /// Get the change history of a ticket.
    #[tool(description = "Get the change history of an OTRS ticket (state changes, moves, ownership changes and so on).")]
    async fn ticket_history_get(
        &self,
        Parameters(input): Parameters<TicketHistoryInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = %input.ticket_id, "ticket_history_get tool called");

        let history = self
            .otrs_client
            .ticket_history(&input.ticket_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = %input.ticket_id, "Failed to get ticket history");
                format!(
                    "Failed to get history for ticket {}: {}",
                    input.ticket_id, sanitized
                )
            })?;

        Ok(format_history(&history))
    }

    /// Get full details of a single config item.
    #[tool(description = "Get details of a single OTRS CMDB config item by its internal ID.")]
    async fn config_item_get(
        &self,
        Parameters(input): Parameters<ConfigItemGetInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(config_item_id = %input.config_item_id, "config_item_get tool called");

        let item = self
            .otrs_client
            .config_item_get(&input.config_item_id)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, config_item_id = %input.config_item_id, "Failed to get config item");
                format!(
                    "Failed to get config item {}: {}",
                    input.config_item_id, sanitized
                )
            })?;

        Ok(format_config_item(&item))
    }

    /// Search for config items matching the given filters.
    #[tool(description = "Search OTRS CMDB config items by class, name substring or deployment state. Returns matching config item IDs; use config_item_get for details.")]
    async fn config_item_search(
        &self,
        Parameters(input): Parameters<ConfigItemSearchInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(?input, "config_item_search tool called");

        let mut params = ConfigItemSearchParams::new();
        if let Some(class) = input.class {
            params = params.with_class(class);
        }
        if let Some(name) = input.name_contains {
            params = params.with_name_contains(name);
        }
        if let Some(state) = input.depl_state {
            params = params.with_depl_state(state);
        }

        let limit = input.limit.unwrap_or(20).min(100);
        params = params.with_limit(limit);

        let config_item_ids = self
            .otrs_client
            .config_item_search(params)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, "Failed to search config items");
                format!("Failed to search config items: {}", sanitized)
            })?;

        Ok(format_config_item_search_results(&config_item_ids))
    }

    /// Sanitizes an error message to remove the OTRS password.
    fn sanitize_error(&self, error: &crate::error::OtrsError) -> String {
        error.sanitized_display(self.otrs_client.password_for_sanitization())
    }
}

#[tool_handler]
impl ServerHandler for OtrsServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "This server provides access to an OTRS help desk. \
                 Use ticket_search to find tickets and ticket_get for full \
                 details including articles. Create tickets with \
                 ticket_create, modify them or add notes with ticket_update, \
                 and inspect changes with ticket_history_get. CMDB config \
                 items are available via config_item_get and \
                 config_item_search. Start with 'ping' to verify connectivity."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Response formatting helpers
// ============================================================================

/// Maximum length for article bodies before truncation.
const MAX_BODY_LENGTH: usize = 2000;

/// Truncates a string if it exceeds the maximum length.
///
/// If truncated, appends "... [truncated]" to indicate the content was cut.
/// The cut never lands inside a multibyte character.
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        let mut end = max_length - 15; // Leave room for "... [truncated]"
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        // Find a good break point (word boundary if possible)
        if let Some(space_pos) = text[..end].rfind(char::is_whitespace) {
            end = space_pos;
        }
        format!("{}... [truncated]", &text[..end])
    }
}

/// Formats full ticket details as human-readable text.
fn format_ticket_details(ticket: &Ticket, web_url: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Ticket #{}: {}\n",
        ticket.display_number(),
        ticket.display_title()
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    output.push_str(&format!("\nState: {}\n", ticket.display_state()));
    output.push_str(&format!("Priority: {}\n", ticket.display_priority()));
    output.push_str(&format!("Queue: {}\n", ticket.display_queue()));

    if let Some(ticket_type) = &ticket.ticket_type {
        output.push_str(&format!("Type: {}\n", ticket_type));
    }

    output.push_str(&format!("\nOwner: {}\n", ticket.display_owner()));
    if let Some(responsible) = &ticket.responsible {
        output.push_str(&format!("Responsible: {}\n", responsible));
    }
    if let Some(customer) = &ticket.customer_user_id {
        output.push_str(&format!("Customer: {}\n", customer));
    }
    if let Some(customer_id) = &ticket.customer_id {
        output.push_str(&format!("Customer ID: {}\n", customer_id));
    }

    if ticket.created.is_some() || ticket.changed.is_some() {
        output.push_str("\n--- Timestamps ---\n");
        if let Some(created) = &ticket.created {
            output.push_str(&format!("Created: {}\n", created));
        }
        if let Some(changed) = &ticket.changed {
            output.push_str(&format!("Changed: {}\n", changed));
        }
    }

    if !ticket.articles.is_empty() {
        output.push_str(&format!("\n--- Articles ({}) ---\n", ticket.articles.len()));
        for article in &ticket.articles {
            output.push_str(&format!(
                "\nFrom: {}\n",
                article.display_from()
            ));
            if let Some(subject) = &article.subject {
                output.push_str(&format!("Subject: {}\n", subject));
            }
            if let Some(created) = &article.create_time {
                output.push_str(&format!("Date: {}\n", created));
            }
            output.push_str(&truncate_text(article.display_body(), MAX_BODY_LENGTH));
            output.push('\n');
        }
    }

    output.push_str(&format!("\nWeb: {}\n", web_url));

    output
}

/// Formats a ticket ID search result as human-readable text.
fn format_search_results(ticket_ids: &[String]) -> String {
    if ticket_ids.is_empty() {
        return "No tickets found matching the criteria.".to_string();
    }

    let mut output = format!("Found {} ticket(s):\n\n", ticket_ids.len());
    for id in ticket_ids {
        output.push_str(&format!("  TicketID: {}\n", id));
    }
    output.push_str("\nUse ticket_get with a ticket_id for full details.\n");
    output
}

/// Formats the result of a ticket create operation.
fn format_create_result(created: &TicketMutationResponse, web_url: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Successfully created ticket #{}\n\n",
        created
            .ticket_number
            .as_deref()
            .unwrap_or(&created.ticket_id)
    ));
    output.push_str(&format!("TicketID: {}\n", created.ticket_id));
    if let Some(article_id) = &created.article_id {
        output.push_str(&format!("ArticleID: {}\n", article_id));
    }
    output.push_str(&format!("Web: {}\n", web_url));

    output.push_str("\nNext steps:\n");
    output.push_str(&format!(
        "  - View details: use ticket_get with ticket_id=\"{}\"\n",
        created.ticket_id
    ));
    output.push_str(&format!(
        "  - Add a note: use ticket_update with ticket_id=\"{}\"\n",
        created.ticket_id
    ));

    output
}

/// Formats the result of a ticket update operation.
fn format_update_result(updated: &TicketMutationResponse, added_note: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Successfully updated ticket #{}\n",
        updated
            .ticket_number
            .as_deref()
            .unwrap_or(&updated.ticket_id)
    ));
    output.push_str(&format!("TicketID: {}\n", updated.ticket_id));

    if added_note {
        match &updated.article_id {
            Some(article_id) => {
                output.push_str(&format!("Note added as ArticleID: {}\n", article_id));
            }
            None => output.push_str("Note added.\n"),
        }
    }

    output
}

/// Formats a ticket history as human-readable text.
fn format_history(history: &TicketHistory) -> String {
    if history.history.is_empty() {
        return format!("No history entries for ticket {}.", history.ticket_id);
    }

    let mut output = format!(
        "History for ticket {} ({} entries):\n\n",
        history.ticket_id,
        history.history.len()
    );

    for entry in &history.history {
        let history_type = entry.history_type.as_deref().unwrap_or("Unknown");
        output.push_str(&format!("[{}]", history_type));
        if let Some(time) = &entry.create_time {
            output.push_str(&format!(" {}", time));
        }
        output.push('\n');
        if let Some(name) = &entry.name {
            output.push_str(&format!("   {}\n", name));
        }
    }

    output
}

/// Formats full config item details as human-readable text.
fn format_config_item(item: &ConfigItem) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Config Item #{}: {}\n",
        item.display_number(),
        item.display_name()
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    output.push_str(&format!("\nClass: {}\n", item.display_class()));
    if let Some(depl_state) = &item.depl_state {
        output.push_str(&format!("Deployment State: {}\n", depl_state));
    }
    if let Some(inci_state) = &item.inci_state {
        output.push_str(&format!("Incident State: {}\n", inci_state));
    }

    if item.create_time.is_some() || item.change_time.is_some() {
        output.push_str("\n--- Timestamps ---\n");
        if let Some(created) = &item.create_time {
            output.push_str(&format!("Created: {}\n", created));
        }
        if let Some(changed) = &item.change_time {
            output.push_str(&format!("Changed: {}\n", changed));
        }
    }

    output
}

/// Formats a config item ID search result as human-readable text.
fn format_config_item_search_results(config_item_ids: &[String]) -> String {
    if config_item_ids.is_empty() {
        return "No config items found matching the criteria.".to_string();
    }

    let mut output = format!("Found {} config item(s):\n\n", config_item_ids.len());
    for id in config_item_ids {
        output.push_str(&format!("  ConfigItemID: {}\n", id));
    }
    output.push_str("\nUse config_item_get with a config_item_id for full details.\n");
    output
}
