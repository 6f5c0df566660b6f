//! Ride booking tool.
//!
//! Geocodes a destination address and returns an Uber deep link that opens
//! the app with pickup at the current location and the dropoff prefilled.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::common::{geo_error_result, structured_result};
use crate::domains::geo::GeoServices;

#[cfg(feature = "http")]
use super::common::to_http_response;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the ride booking tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BookUberParams {
    /// Destination, as free text.
    #[schemars(description = "Destination address (free text, e.g. '1600 Amphitheatre Parkway')")]
    pub address: String,
}

// ============================================================================
// Structured Output
// ============================================================================

/// Structured output for a booking link.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookUberResult {
    pub deep_link: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Ride booking tool implementation.
#[derive(Debug, Clone)]
pub struct BookUberTool;

impl BookUberTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "book_uber";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get the URL link to book an Uber ride to a given address from current location. \
         The address is geocoded first; the returned deep link carries the canonical \
         address and its coordinates as the dropoff.";

    /// Execute the tool logic.
    pub async fn execute(params: &BookUberParams, services: &GeoServices) -> CallToolResult {
        info!("Book ride tool called for address: {}", params.address);

        match services.book_ride(&params.address).await {
            Ok((location, link)) => {
                let data = BookUberResult {
                    deep_link: link.to_string(),
                    formatted_address: location.formatted_address,
                    latitude: location.latitude,
                    longitude: location.longitude,
                };
                structured_result(link.into_string(), data)
            }
            Err(e) => geo_error_result("Failed to build booking link", &e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        services: Arc<GeoServices>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: BookUberParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(&params, &services).await;
        Ok(to_http_response(result)?)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<BookUberParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Book an Uber ride".into()),
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
                let params: BookUberParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &services).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
