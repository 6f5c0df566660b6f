//! Domains module containing business logic organized by bounded contexts.
//!
//! - **geo**: address resolution, ride deep links and device positioning
//! - **tools**: the MCP tools exposing the geo operations to clients

pub mod geo;
pub mod tools;
