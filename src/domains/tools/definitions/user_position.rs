//! Current position tool.
//!
//! Estimates where the user is from network signals (cell/IP) and returns
//! `[latitude, longitude, accuracy_meters]`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::common::{geo_error_result, structured_result};
use crate::domains::geo::GeoServices;

#[cfg(feature = "http")]
use super::common::to_http_response;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// The tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UserPositionParams {}

/// Current position tool implementation.
#[derive(Debug, Clone)]
pub struct UserPositionTool;

impl UserPositionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_user_position";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Estimate the user's current position from network signals. Returns \
         [latitude, longitude, accuracy_meters]; accuracy is the radius of the \
         confidence circle in meters.";

    /// Execute the tool logic.
    pub async fn execute(services: &GeoServices) -> CallToolResult {
        info!("User position tool called");

        match services.current_position().await {
            Ok(estimate) => {
                let summary = serde_json::to_string(&estimate.as_triple())
                    .unwrap_or_else(|_| format!("{:?}", estimate.as_triple()));
                structured_result(summary, estimate)
            }
            Err(e) => geo_error_result("Failed to estimate position", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        services: Arc<GeoServices>,
    ) -> Result<serde_json::Value, ToolError> {
        if !arguments.is_null() {
            let _: UserPositionParams = serde_json::from_value(arguments)
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        }

        let result = Self::execute(&services).await;
        Ok(to_http_response(result)?)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UserPositionParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp transport.
    pub fn create_route<S>(services: Arc<GeoServices>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let services = services.clone();
            async move {
                let _: UserPositionParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&services).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::geo::PositionEstimate;
    use rmcp::model::RawContent;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn services_with(response: ResponseTemplate) -> (MockServer, GeoServices) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/geolocate"))
            .respond_with(response)
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.geo.geolocate_url = format!("{}/geolocate", server.uri());
        let services = GeoServices::new(&config).unwrap();
        (server, services)
    }

    #[tokio::test]
    async fn test_execute_returns_triple() {
        let (_server, services) = services_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "lat": 37.4, "lng": -122.1 },
            "accuracy": 20
        })))
        .await;

        let result = UserPositionTool::execute(&services).await;
        assert_eq!(result.is_error, Some(false));

        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("expected text content");
        };
        let triple: Vec<f64> = serde_json::from_str(&text.text).unwrap();
        assert_eq!(triple, vec![37.4, -122.1, 20.0]);

        let estimate: PositionEstimate =
            serde_json::from_value(result.structured_content.unwrap()).unwrap();
        assert_eq!(estimate.accuracy_meters, 20.0);
    }

    #[tokio::test]
    async fn test_execute_provider_error_reports_status() {
        let (_server, services) =
            services_with(ResponseTemplate::new(403).set_body_string("forbidden")).await;

        let result = UserPositionTool::execute(&services).await;
        assert_eq!(result.is_error, Some(true));

        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("expected text content");
        };
        assert!(text.text.contains("HTTP 403"));
        assert!(text.text.contains("forbidden"));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_handler_accepts_null_arguments() {
        let (_server, services) = services_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "lat": 1.5, "lng": 2.5 },
            "accuracy": 30
        })))
        .await;

        let body = UserPositionTool::http_handler(serde_json::Value::Null, Arc::new(services))
            .await
            .unwrap();
        assert_eq!(body["isError"], false);
        assert_eq!(body["structuredContent"]["latitude"], 1.5);
    }
}
