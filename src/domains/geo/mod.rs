//! Geo domain module.
//!
//! A small façade over a geocoding provider, a network geolocation provider
//! and a ride-booking deep-link scheme:
//!
//! - `resolver` - free-text address to [`LocationRecord`]
//! - `deep_link` - [`LocationRecord`] to [`RideDeepLink`]
//! - `locator` - network-based [`PositionEstimate`] of the caller
//!
//! Every operation is a single request/response call with no shared mutable
//! state; the components only hold a pooled HTTP client and read-only settings.

mod client;
pub mod deep_link;
mod error;
pub mod locator;
pub mod models;
pub mod resolver;

pub use client::{DEFAULT_GEOCODE_URL, DEFAULT_GEOLOCATE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use deep_link::{DEFAULT_SCHEME_PREFIX, RideLinkBuilder};
pub use error::GeoError;
pub use locator::{DeviceLocator, NetworkHints, PositionObserver, TracingObserver};
pub use models::{LocationRecord, PositionEstimate, RideDeepLink};
pub use resolver::AddressResolver;

use std::sync::Arc;
use tracing::instrument;

use crate::core::config::Config;

/// The three geo components, built once per process and shared by all tools.
#[derive(Clone)]
pub struct GeoServices {
    pub resolver: AddressResolver,
    pub link_builder: RideLinkBuilder,
    pub locator: DeviceLocator,
}

impl GeoServices {
    /// Build every component from the configuration.
    pub fn new(config: &Config) -> Result<Self, GeoError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Same as [`GeoServices::new`] with a custom position observer.
    pub fn with_observer(
        config: &Config,
        observer: Arc<dyn PositionObserver>,
    ) -> Result<Self, GeoError> {
        Ok(Self {
            resolver: AddressResolver::new(config)?,
            link_builder: RideLinkBuilder::new(config.geo.deep_link_scheme.clone()),
            locator: DeviceLocator::with_observer(config, observer)?,
        })
    }

    /// Resolve `address` and turn it into a booking deep link.
    #[instrument(skip(self))]
    pub async fn book_ride(
        &self,
        address: &str,
    ) -> Result<(LocationRecord, RideDeepLink), GeoError> {
        let location = self.resolver.resolve(address).await?;
        let link = self.link_builder.build(&location)?;
        Ok((location, link))
    }

    /// Estimate the caller's current position.
    pub async fn current_position(&self) -> Result<PositionEstimate, GeoError> {
        self.locator.locate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_book_ride_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode"))
            .and(query_param("address", "1600 Amphitheatre Parkway"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                    "geometry": { "location": { "lat": 37.422, "lng": -122.084 } }
                }]
            })))
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.geo.geocode_url = format!("{}/geocode", server.uri());
        let services = GeoServices::new(&config).unwrap();

        let (location, link) = services
            .book_ride("1600 Amphitheatre Parkway")
            .await
            .unwrap();

        assert_eq!(location.formatted_address, "1600 Amphitheatre Pkwy, Mountain View, CA");
        assert!(link.as_str().starts_with("uber://?action=setPickup"));
        assert!(link.as_str().contains("dropoff%5Blatitude%5D=37.422"));
        assert!(link.as_str().contains("dropoff%5Blongitude%5D=-122.084"));
    }

    #[tokio::test]
    async fn test_book_ride_not_found_builds_no_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS" })),
            )
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.geo.geocode_url = format!("{}/geocode", server.uri());
        let services = GeoServices::new(&config).unwrap();

        let result = services.book_ride("nowhere at all").await;
        assert!(matches!(result, Err(GeoError::NotFound { .. })));
    }
}
