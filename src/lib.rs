//! Ride-link MCP server library.
//!
//! Exposes two MCP tools backed by a small geo façade:
//!
//! - `book_uber`: geocode an address and build a ride-booking deep link
//! - `get_user_position`: estimate the caller's position from network signals
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and its transports
//! - **domains**
//!   - **geo**: `AddressResolver`, `RideLinkBuilder`, `DeviceLocator`
//!   - **tools**: MCP tool definitions wrapping the geo operations
//!
//! # Example
//!
//! ```rust,no_run
//! use ride_link_mcp_server::{core::Config, domains::geo::GeoServices};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let services = GeoServices::new(&config)?;
//!     let (_location, link) = services.book_ride("1600 Amphitheatre Parkway").await?;
//!     println!("{link}");
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
