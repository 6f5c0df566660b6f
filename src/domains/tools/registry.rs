//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - The names of the registered tools

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use crate::domains::geo::GeoServices;

#[cfg(feature = "http")]
use super::ToolError;
use super::definitions::{BookUberTool, UserPositionTool};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    services: Arc<GeoServices>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(services: Arc<GeoServices>) -> Self {
        Self { services }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![BookUberTool::NAME, UserPositionTool::NAME]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        match name {
            BookUberTool::NAME => BookUberTool::http_handler(arguments, self.services.clone()).await,
            UserPositionTool::NAME => {
                UserPositionTool::http_handler(arguments, self.services.clone()).await
            }
            _ => {
                warn!(
                    "Unknown tool requested: {} (available: {:?})",
                    name,
                    self.tool_names()
                );
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn test_services() -> Arc<GeoServices> {
        Arc::new(GeoServices::new(&Config::with_api_key("test-key")).unwrap())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_services());
        let names = registry.tool_names();
        assert_eq!(names, vec!["book_uber", "get_user_position"]);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_services());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "unknown"));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_invalid_arguments() {
        let registry = ToolRegistry::new(test_services());
        let result = registry
            .call_tool("book_uber", serde_json::json!({ "address": 42 }))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
