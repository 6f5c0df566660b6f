//! Helpers shared by the tool definitions.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use crate::domains::geo::GeoError;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Turn a geo failure into a tool error result.
pub fn geo_error_result(context: &str, error: &GeoError) -> CallToolResult {
    error_result(&format!("{}: {}", context, error))
}

/// Create a success result with a text summary and structured content.
///
/// Falls back to text-only if the structured data cannot be serialized.
pub fn structured_result<T: Serialize>(summary: String, data: T) -> CallToolResult {
    match serde_json::to_value(&data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            CallToolResult::success(vec![Content::text(summary)])
        }
    }
}

/// Render a tool result as the JSON body returned by the HTTP transport.
#[cfg(feature = "http")]
pub fn to_http_response(result: CallToolResult) -> Result<serde_json::Value, serde_json::Error> {
    let mut response = serde_json::Map::new();
    response.insert("content".to_string(), serde_json::to_value(&result.content)?);
    response.insert(
        "isError".to_string(),
        serde_json::Value::Bool(result.is_error.unwrap_or(false)),
    );

    if let Some(structured) = result.structured_content {
        response.insert("structuredContent".to_string(), structured);
    }

    Ok(serde_json::Value::Object(response))
}
