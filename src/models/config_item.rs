//! Config item (CMDB) models for the OTRS Generic Interface.
//!
//! Covers the `ConfigItemGet` and `ConfigItemSearch` operations provided
//! by the ITSM configuration management connector.

use serde::Deserialize;

use super::common::{deserialize_id, deserialize_id_list, deserialize_opt_id};

/// A configuration item as returned by `ConfigItemGet`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigItem {
    /// Internal config item ID.
    #[serde(rename = "ConfigItemID", deserialize_with = "deserialize_id")]
    pub config_item_id: String,

    /// Human-facing CI number.
    #[serde(rename = "Number", deserialize_with = "deserialize_opt_id", default)]
    pub number: Option<String>,

    /// CI name.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    /// CI class, e.g. "Computer", "Network".
    #[serde(rename = "Class", default)]
    pub class: Option<String>,

    /// Deployment state, e.g. "Production", "Retired".
    #[serde(rename = "DeplState", default)]
    pub depl_state: Option<String>,

    /// Incident state, e.g. "Operational", "Incident".
    #[serde(rename = "InciState", default)]
    pub inci_state: Option<String>,

    /// Creation timestamp.
    #[serde(rename = "CreateTime", default)]
    pub create_time: Option<String>,

    /// Last change timestamp.
    #[serde(rename = "ChangeTime", default)]
    pub change_time: Option<String>,
}

impl ConfigItem {
    /// Returns the CI name or a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(Unnamed)")
    }

    /// Returns the CI number or the internal ID.
    pub fn display_number(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.config_item_id)
    }

    /// Returns the class or a placeholder.
    pub fn display_class(&self) -> &str {
        self.class.as_deref().unwrap_or("Unknown")
    }
}

/// Response payload for `ConfigItemGet`.
///
/// As with tickets, OTRS wraps the result in a one-element array.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigItemGetResponse {
    /// The returned config items.
    #[serde(rename = "ConfigItem", default)]
    pub config_items: Vec<ConfigItem>,
}

/// Response payload for `ConfigItemSearch`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigItemSearchResponse {
    /// Matching config item IDs.
    #[serde(rename = "ConfigItemIDs", deserialize_with = "deserialize_id_list", default)]
    pub config_item_ids: Vec<String>,
}
