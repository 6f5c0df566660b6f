//! Address resolution through a geocoding provider.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

use super::GeoError;
use super::client::{LatLng, build_http_client, decode_json, provider_error};
use super::models::LocationRecord;
use crate::core::config::Config;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

/// Turns free-text addresses into [`LocationRecord`]s.
#[derive(Clone)]
pub struct AddressResolver {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AddressResolver {
    /// Create a resolver from the geocoding section of the configuration.
    pub fn new(config: &Config) -> Result<Self, GeoError> {
        let timeout = Duration::from_secs(config.geo.request_timeout_secs);
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: config.geo.geocode_url.clone(),
            api_key: config.credentials.google_api_key.clone(),
        })
    }

    /// Geocode `address` and return the first match.
    ///
    /// Exactly one request is sent; failures are never retried.
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<LocationRecord, GeoError> {
        if address.trim().is_empty() {
            return Err(GeoError::precondition("address must not be empty"));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error("geocode", response).await);
        }

        let payload: GeocodeResponse = decode_json(response).await?;
        let record = Self::first_location(address, payload)?;

        info!(
            latitude = record.latitude,
            longitude = record.longitude,
            "Resolved address to '{}'",
            record.formatted_address
        );
        Ok(record)
    }

    /// Pick the first result, checking the provider status and result list first.
    fn first_location(address: &str, payload: GeocodeResponse) -> Result<LocationRecord, GeoError> {
        match payload.status.as_deref() {
            None | Some("OK") => {}
            Some("ZERO_RESULTS") => return Err(GeoError::not_found(address)),
            Some(other) => {
                let detail = payload.error_message.as_deref().unwrap_or("no error message");
                return Err(GeoError::invalid_response(format!("{other}: {detail}")));
            }
        }

        let Some(first) = payload.results.into_iter().next() else {
            return Err(GeoError::not_found(address));
        };

        if first.formatted_address.trim().is_empty() {
            return Err(GeoError::invalid_response(
                "result is missing a formatted address",
            ));
        }

        Ok(LocationRecord {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            formatted_address: first.formatted_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GEOCODE_PATH: &str = "/maps/api/geocode/json";

    fn resolver_for(server: &MockServer) -> AddressResolver {
        let mut config = Config::with_api_key("test-key");
        config.geo.geocode_url = format!("{}{}", server.uri(), GEOCODE_PATH);
        AddressResolver::new(&config).unwrap()
    }

    fn amphitheatre_body() -> serde_json::Value {
        json!({
            "status": "OK",
            "results": [{
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                "geometry": { "location": { "lat": 37.422, "lng": -122.084 } }
            }]
        })
    }

    #[tokio::test]
    async fn test_resolve_returns_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("address", "1600 Amphitheatre Parkway"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(amphitheatre_body()))
            .expect(1)
            .mount(&server)
            .await;

        let record = resolver_for(&server)
            .resolve("1600 Amphitheatre Parkway")
            .await
            .unwrap();

        assert_eq!(record.latitude, 37.422);
        assert_eq!(record.longitude, -122.084);
        assert_eq!(
            record.formatted_address,
            "1600 Amphitheatre Pkwy, Mountain View, CA"
        );
    }

    #[tokio::test]
    async fn test_resolve_sends_address_as_given() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("address", "  10 Downing St "))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "results": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = resolver_for(&server)
            .resolve("  10 Downing St ")
            .await
            .unwrap_err();
        assert!(matches!(err, GeoError::NotFound { ref address } if address == "  10 Downing St "));
    }

    #[tokio::test]
    async fn test_resolve_empty_results_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "results": [] })),
            )
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, GeoError::NotFound { ref address } if address == "Atlantis"));
    }

    #[tokio::test]
    async fn test_resolve_zero_results_status_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
            )
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, GeoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_denied_status_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            })))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("Paris").await.unwrap_err();
        match err {
            GeoError::InvalidResponse { message } => {
                assert!(message.contains("REQUEST_DENIED"));
                assert!(message.contains("API key is invalid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_http_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("Paris").await.unwrap_err();
        match err {
            GeoError::Provider { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "backend unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("Paris").await.unwrap_err();
        assert!(matches!(err, GeoError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_resolve_blank_address_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(amphitheatre_body()))
            .expect(0)
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("   ").await.unwrap_err();
        assert!(matches!(err, GeoError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_resolve_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(amphitheatre_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.geo.geocode_url = format!("{}{}", server.uri(), GEOCODE_PATH);
        config.geo.request_timeout_secs = 1;
        let resolver = AddressResolver::new(&config).unwrap();

        let err = resolver.resolve("Paris").await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }
}
