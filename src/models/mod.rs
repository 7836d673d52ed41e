//! Data models for the OTRS Generic Interface.
//!
//! This module contains type definitions for the OTRS web service API,
//! including ticket and article models, config item models and common
//! response types.

mod common;
mod config_item;
mod ticket;

pub use common::*;
pub use config_item::*;
pub use ticket::*;
