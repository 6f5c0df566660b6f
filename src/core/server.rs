//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the geo services.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::geo::GeoServices;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. Cloning is
/// cheap: configuration and services are shared behind `Arc`s.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Geo components shared by every tool call.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    services: Arc<GeoServices>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Instructions reported to clients on initialization.
    pub const INSTRUCTIONS: &'static str = "Ride booking helper. Use book_uber to turn a street \
         address into an Uber deep link with pickup at the current location, and \
         get_user_position to estimate where the user currently is.";

    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only if the outbound HTTP clients cannot be built.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let services = Arc::new(GeoServices::new(&config)?);
        Ok(Self::with_services(config, services))
    }

    /// Create a server around already-built services.
    pub fn with_services(config: Config, services: Arc<GeoServices>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(services.clone()),
            config: Arc::new(config),
            services,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Dispatches through the ToolRegistry; each tool's http_handler lives
    /// in its own file under `domains/tools/definitions/`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.services.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(Self::INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::service::RunningService;
    use rmcp::{RoleClient, ServiceError, ServiceExt};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serve `server` over an in-memory pipe and connect a bare rmcp client.
    async fn connect(server: McpServer) -> RunningService<RoleClient, ()> {
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        tokio::spawn(async move {
            if let Ok(running) = server.serve(server_io).await {
                let _ = running.waiting().await;
            }
        });
        ().serve(client_io).await.unwrap()
    }

    fn call(name: &'static str, arguments: Option<serde_json::Value>) -> CallToolRequestParam {
        CallToolRequestParam {
            name: name.into(),
            arguments: arguments.and_then(|v| v.as_object().cloned()),
        }
    }

    fn assert_invalid_params(result: std::result::Result<CallToolResult, ServiceError>) {
        match result {
            Err(ServiceError::McpError(e)) => assert_eq!(e.code, ErrorCode::INVALID_PARAMS),
            other => panic!("expected invalid params error, got {other:?}"),
        }
    }

    #[test]
    fn test_server_lists_both_tools() {
        let server = McpServer::new(Config::with_api_key("k")).unwrap();
        let names: Vec<String> = server
            .list_tools()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"book_uber".to_string()));
        assert!(names.contains(&"get_user_position".to_string()));
    }

    #[test]
    fn test_server_info_advertises_tools_only() {
        let server = McpServer::new(Config::with_api_key("k")).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert!(info.instructions.unwrap().contains("book_uber"));
    }

    #[tokio::test]
    async fn test_rmcp_book_uber_rejects_non_string_address() {
        let client = connect(McpServer::new(Config::with_api_key("k")).unwrap()).await;

        let result = client
            .call_tool(call("book_uber", Some(json!({ "address": 42 }))))
            .await;
        assert_invalid_params(result);

        client.cancel().await.unwrap();
    }

    #[tokio::test]
    async fn test_rmcp_book_uber_missing_arguments_is_invalid_params() {
        let client = connect(McpServer::new(Config::with_api_key("k")).unwrap()).await;

        assert_invalid_params(client.call_tool(call("book_uber", None)).await);

        client.cancel().await.unwrap();
    }

    #[tokio::test]
    async fn test_rmcp_user_position_without_arguments() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/geolocate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": { "lat": 37.4, "lng": -122.1 },
                "accuracy": 20
            })))
            .mount(&upstream)
            .await;

        let mut config = Config::with_api_key("k");
        config.geo.geolocate_url = format!("{}/geolocate", upstream.uri());
        let client = connect(McpServer::new(config).unwrap()).await;

        let result = client
            .call_tool(call("get_user_position", None))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("expected text content");
        };
        let triple: Vec<f64> = serde_json::from_str(&text.text).unwrap();
        assert_eq!(triple, vec![37.4, -122.1, 20.0]);

        client.cancel().await.unwrap();
    }
}
