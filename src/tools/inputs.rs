//! Tool input parameter structs for MCP tools.
//!
//! This module defines the input types for each MCP tool, with
//! JSON Schema derivation for MCP tool discovery.
//!
//! # Input Sanitization
//!
//! All input structs implement `sanitize()` which trims whitespace
//! from string fields. This should be called before processing input.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Helper function to trim an optional string.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Input parameters for the session_create tool.
///
/// Credentials default to the server's configured OTRS agent account.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionCreateInput {
    /// Agent login to authenticate as (defaults to the configured account).
    #[serde(default)]
    pub user: Option<String>,

    /// Password for the agent login (defaults to the configured account).
    #[serde(default)]
    pub password: Option<String>,
}

impl SessionCreateInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            user: trim_option(&self.user),
            // Deliberately untrimmed; a password may contain spaces.
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

/// Input parameters for the ticket_create tool.
///
/// Title is required. Queue, state and priority fall back to the
/// configured `OTRS_DEFAULT_*` values when omitted.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketCreateInput {
    /// Ticket title/subject (required).
    pub title: String,

    /// Initial article body; defaults to the title when omitted.
    #[serde(default)]
    pub body: Option<String>,

    /// Queue to create the ticket in (e.g. "Raw", "Postmaster").
    #[serde(default)]
    pub queue: Option<String>,

    /// Initial state (e.g. "new", "open").
    #[serde(default)]
    pub state: Option<String>,

    /// Priority (e.g. "1 very low" .. "5 very high").
    #[serde(default)]
    pub priority: Option<String>,

    /// Customer user login the ticket is filed for.
    #[serde(default)]
    pub customer_user: Option<String>,

    /// Ticket type, if the installation uses types.
    #[serde(default)]
    pub ticket_type: Option<String>,
}

impl TicketCreateInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            body: trim_option(&self.body),
            queue: trim_option(&self.queue),
            state: trim_option(&self.state),
            priority: trim_option(&self.priority),
            customer_user: trim_option(&self.customer_user),
            ticket_type: trim_option(&self.ticket_type),
        }
    }
}

/// Input parameters for the ticket_get tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketGetInput {
    /// The internal ID of the ticket to retrieve.
    pub ticket_id: String,

    /// If true, include all articles (default: true).
    #[serde(default)]
    pub include_articles: Option<bool>,
}

impl TicketGetInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
            include_articles: self.include_articles,
        }
    }
}

/// Input parameters for the ticket_search tool.
///
/// All fields are optional - use them to narrow the result set.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketSearchInput {
    /// Filter by queue name (e.g. "Raw", "Postmaster").
    #[serde(default)]
    pub queue: Option<String>,

    /// Filter by state name (e.g. "open", "closed successful").
    #[serde(default)]
    pub state: Option<String>,

    /// Filter by priority name (e.g. "3 normal").
    #[serde(default)]
    pub priority: Option<String>,

    /// Search by title substring.
    #[serde(default)]
    pub title_contains: Option<String>,

    /// Filter by customer user login.
    #[serde(default)]
    pub customer_user: Option<String>,

    /// Maximum number of ticket IDs to return (default: 20, max: 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TicketSearchInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            queue: trim_option(&self.queue),
            state: trim_option(&self.state),
            priority: trim_option(&self.priority),
            title_contains: trim_option(&self.title_contains),
            customer_user: trim_option(&self.customer_user),
            limit: self.limit,
        }
    }
}

/// Input parameters for the ticket_update tool.
///
/// Ticket ID is required. At least one other field must be provided.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketUpdateInput {
    /// The internal ID of the ticket to update.
    pub ticket_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// Move to this queue.
    #[serde(default)]
    pub queue: Option<String>,

    /// New state (e.g. "closed successful").
    #[serde(default)]
    pub state: Option<String>,

    /// New priority.
    #[serde(default)]
    pub priority: Option<String>,

    /// Reassign to this agent login.
    #[serde(default)]
    pub owner: Option<String>,

    /// Note text to attach as an article alongside the update.
    #[serde(default)]
    pub note: Option<String>,
}

impl TicketUpdateInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
            title: trim_option(&self.title),
            queue: trim_option(&self.queue),
            state: trim_option(&self.state),
            priority: trim_option(&self.priority),
            owner: trim_option(&self.owner),
            note: trim_option(&self.note),
        }
    }

    /// Returns true if at least one field besides the ID is being updated.
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.queue.is_some()
            || self.state.is_some()
            || self.priority.is_some()
            || self.owner.is_some()
            || self.note.is_some()
    }
}

/// Input parameters for the ticket_history_get tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TicketHistoryInput {
    /// The internal ID of the ticket.
    pub ticket_id: String,
}

impl TicketHistoryInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
        }
    }
}

/// Input parameters for the config_item_get tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConfigItemGetInput {
    /// The internal ID of the config item to retrieve.
    pub config_item_id: String,
}

impl ConfigItemGetInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            config_item_id: self.config_item_id.trim().to_string(),
        }
    }
}

/// Input parameters for the config_item_search tool.
///
/// All fields are optional.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConfigItemSearchInput {
    /// Filter by CI class (e.g. "Computer", "Network").
    #[serde(default)]
    pub class: Option<String>,

    /// Search by CI name substring.
    #[serde(default)]
    pub name_contains: Option<String>,

    /// Filter by deployment state (e.g. "Production").
    #[serde(default)]
    pub depl_state: Option<String>,

    /// Maximum number of config item IDs to return (default: 20, max: 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ConfigItemSearchInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            class: trim_option(&self.class),
            name_contains: trim_option(&self.name_contains),
            depl_state: trim_option(&self.depl_state),
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_option_discards_whitespace_only() {
        assert_eq!(trim_option(&Some("  ".to_string())), None);
        assert_eq!(trim_option(&Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(trim_option(&None), None);
    }

    #[test]
    fn test_ticket_create_sanitize() {
        let input = TicketCreateInput {
            title: "  Printer on fire  ".to_string(),
            body: Some("   ".to_string()),
            queue: Some(" Raw ".to_string()),
            state: None,
            priority: None,
            customer_user: None,
            ticket_type: None,
        };
        let input = input.sanitize();
        assert_eq!(input.title, "Printer on fire");
        assert_eq!(input.body, None);
        assert_eq!(input.queue.as_deref(), Some("Raw"));
    }

    #[test]
    fn test_session_create_keeps_password_spaces() {
        let input = SessionCreateInput {
            user: Some(" agent ".to_string()),
            password: Some(" pass word ".to_string()),
        };
        let input = input.sanitize();
        assert_eq!(input.user.as_deref(), Some("agent"));
        assert_eq!(input.password.as_deref(), Some(" pass word "));
    }

    #[test]
    fn test_ticket_update_has_updates() {
        let base = TicketUpdateInput {
            ticket_id: "1".to_string(),
            title: None,
            queue: None,
            state: None,
            priority: None,
            owner: None,
            note: None,
        };
        assert!(!base.has_updates());

        let with_state = TicketUpdateInput {
            state: Some("closed successful".to_string()),
            ..base.clone()
        };
        assert!(with_state.has_updates());

        let with_note = TicketUpdateInput {
            note: Some("resolved by reboot".to_string()),
            ..base
        };
        assert!(with_note.has_updates());
    }

    #[test]
    fn test_ticket_search_deserializes_with_defaults() {
        let input: TicketSearchInput = serde_json::from_str("{}").unwrap();
        assert!(input.queue.is_none());
        assert!(input.limit.is_none());
    }
}
