//! Ticket models for the OTRS Generic Interface.
//!
//! This module defines the data structures for tickets, articles and
//! ticket history as returned by the `TicketGet`, `TicketSearch`,
//! `TicketCreate`, `TicketUpdate` and `TicketHistoryGet` operations.

use serde::{Deserialize, Serialize};

use super::common::{deserialize_id, deserialize_id_list, deserialize_opt_id};

/// A ticket as returned by `TicketGet`.
///
/// OTRS returns far more fields than these; only the ones the MCP tools
/// surface are modelled, everything else is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    /// Internal ticket ID.
    #[serde(rename = "TicketID", deserialize_with = "deserialize_id")]
    pub ticket_id: String,

    /// Human-facing ticket number.
    #[serde(rename = "TicketNumber", deserialize_with = "deserialize_opt_id", default)]
    pub ticket_number: Option<String>,

    /// Ticket title/subject.
    #[serde(rename = "Title", default)]
    pub title: Option<String>,

    /// Queue the ticket lives in.
    #[serde(rename = "Queue", default)]
    pub queue: Option<String>,

    /// Current state, e.g. "new", "open", "closed successful".
    #[serde(rename = "State", default)]
    pub state: Option<String>,

    /// Priority, e.g. "3 normal".
    #[serde(rename = "Priority", default)]
    pub priority: Option<String>,

    /// Ticket type, if the installation uses types.
    #[serde(rename = "Type", default)]
    pub ticket_type: Option<String>,

    /// Owning agent login.
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,

    /// Responsible agent login.
    #[serde(rename = "Responsible", default)]
    pub responsible: Option<String>,

    /// Customer company ID.
    #[serde(rename = "CustomerID", default)]
    pub customer_id: Option<String>,

    /// Customer user login.
    #[serde(rename = "CustomerUserID", default)]
    pub customer_user_id: Option<String>,

    /// Creation timestamp as reported by OTRS.
    #[serde(rename = "Created", default)]
    pub created: Option<String>,

    /// Last change timestamp as reported by OTRS.
    #[serde(rename = "Changed", default)]
    pub changed: Option<String>,

    /// Articles, present when `TicketGet` is called with article expansion.
    #[serde(rename = "Article", default)]
    pub articles: Vec<Article>,
}

impl Ticket {
    /// Returns the title or a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(No title)")
    }

    /// Returns the ticket number or the internal ID.
    pub fn display_number(&self) -> &str {
        self.ticket_number.as_deref().unwrap_or(&self.ticket_id)
    }

    /// Returns the queue name or a placeholder.
    pub fn display_queue(&self) -> &str {
        self.queue.as_deref().unwrap_or("Unknown")
    }

    /// Returns the state or a placeholder.
    pub fn display_state(&self) -> &str {
        self.state.as_deref().unwrap_or("Unknown")
    }

    /// Returns the priority or a placeholder.
    pub fn display_priority(&self) -> &str {
        self.priority.as_deref().unwrap_or("Unknown")
    }

    /// Returns the owning agent or a placeholder.
    pub fn display_owner(&self) -> &str {
        self.owner.as_deref().unwrap_or("Unassigned")
    }
}

/// A communication article attached to a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    /// Internal article ID.
    #[serde(rename = "ArticleID", deserialize_with = "deserialize_opt_id", default)]
    pub article_id: Option<String>,

    /// Sender address or agent.
    #[serde(rename = "From", default)]
    pub from: Option<String>,

    /// Recipient address.
    #[serde(rename = "To", default)]
    pub to: Option<String>,

    /// Article subject.
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,

    /// Article body text.
    #[serde(rename = "Body", default)]
    pub body: Option<String>,

    /// MIME content type of the body.
    #[serde(rename = "ContentType", default)]
    pub content_type: Option<String>,

    /// Creation timestamp.
    #[serde(rename = "CreateTime", default)]
    pub create_time: Option<String>,
}

impl Article {
    /// Returns the body or a placeholder.
    pub fn display_body(&self) -> &str {
        self.body.as_deref().unwrap_or("(No content)")
    }

    /// Returns the sender or a placeholder.
    pub fn display_from(&self) -> &str {
        self.from.as_deref().unwrap_or("Unknown")
    }
}

/// Article payload for `TicketCreate` and `TicketUpdate` notes.
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    /// Article subject.
    #[serde(rename = "Subject")]
    pub subject: String,

    /// Article body text.
    #[serde(rename = "Body")]
    pub body: String,

    /// MIME content type; OTRS requires it on article creation.
    #[serde(rename = "ContentType")]
    pub content_type: String,
}

impl NewArticle {
    /// Creates a plain-text article payload.
    pub fn plain_text(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            content_type: "text/plain; charset=utf8".to_string(),
        }
    }
}

/// Response payload for `TicketGet`.
///
/// OTRS wraps the result in a one-element `Ticket` array.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketGetResponse {
    /// The returned tickets.
    #[serde(rename = "Ticket", default)]
    pub tickets: Vec<Ticket>,
}

/// Response payload for `TicketSearch`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSearchResponse {
    /// Matching ticket IDs, most recent first.
    #[serde(rename = "TicketID", deserialize_with = "deserialize_id_list", default)]
    pub ticket_ids: Vec<String>,
}

/// Response payload for `TicketCreate` and `TicketUpdate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketMutationResponse {
    /// Internal ID of the created/updated ticket.
    #[serde(rename = "TicketID", deserialize_with = "deserialize_id")]
    pub ticket_id: String,

    /// Human-facing ticket number.
    #[serde(rename = "TicketNumber", deserialize_with = "deserialize_opt_id", default)]
    pub ticket_number: Option<String>,

    /// ID of the article created alongside, if any.
    #[serde(rename = "ArticleID", deserialize_with = "deserialize_opt_id", default)]
    pub article_id: Option<String>,
}

/// A single entry in a ticket's history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// History type, e.g. "NewTicket", "StateUpdate", "Move".
    #[serde(rename = "HistoryType", default)]
    pub history_type: Option<String>,

    /// Free-text description of the change.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    /// Agent/user ID that performed the change.
    #[serde(rename = "CreateBy", deserialize_with = "deserialize_opt_id", default)]
    pub create_by: Option<String>,

    /// When the change happened.
    #[serde(rename = "CreateTime", default)]
    pub create_time: Option<String>,
}

/// Per-ticket history block inside a `TicketHistoryGet` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketHistory {
    /// The ticket the history belongs to.
    #[serde(rename = "TicketID", deserialize_with = "deserialize_id")]
    pub ticket_id: String,

    /// History entries, oldest first.
    #[serde(rename = "History", default)]
    pub history: Vec<HistoryEntry>,
}

/// Response payload for `TicketHistoryGet`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketHistoryResponse {
    /// History blocks, one per requested ticket.
    #[serde(rename = "TicketHistory", default)]
    pub ticket_history: Vec<TicketHistory>,
}
