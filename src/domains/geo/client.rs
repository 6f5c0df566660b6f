//! Shared HTTP plumbing for the geo providers.

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::GeoError;

/// Google Maps geocoding endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google geolocation endpoint.
pub const DEFAULT_GEOLOCATE_URL: &str = "https://www.googleapis.com/geolocation/v1/geolocate";

/// Per-request timeout applied to every outbound call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// `{ "lat": .., "lng": .. }` as used by both Google APIs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Build a client with the given request timeout.
pub(super) fn build_http_client(timeout: Duration) -> Result<Client, GeoError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GeoError::Client(format!("Failed to create HTTP client: {}", e)))
}

/// Consume a non-success response into a [`GeoError::Provider`].
pub(super) async fn provider_error(provider: &str, response: Response) -> GeoError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(provider, status, "Provider returned an error status");
    GeoError::provider(status, body)
}

/// Read the body of a success response and decode it as JSON.
pub(super) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, GeoError> {
    let bytes = response.bytes().await?;
    debug!("Provider response received: {} bytes", bytes.len());
    serde_json::from_slice(&bytes)
        .map_err(|e| GeoError::invalid_response(format!("JSON parse error: {e}")))
}
