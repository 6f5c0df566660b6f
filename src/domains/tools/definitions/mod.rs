//! Tool definitions module.
//!
//! Each tool is defined in its own file.

pub mod book_uber;
pub mod common;
pub mod user_position;

pub use book_uber::{BookUberParams, BookUberResult, BookUberTool};
pub use user_position::{UserPositionParams, UserPositionTool};
