//! MCP tool implementations for the OTRS MCP server.
//!
//! This module contains the input types and helper functions for
//! MCP tools that expose OTRS ticketing operations.

mod inputs;

pub use inputs::*;
