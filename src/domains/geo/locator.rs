//! Network-based device position estimates.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::GeoError;
use super::client::{LatLng, build_http_client, decode_json, provider_error};
use super::models::PositionEstimate;
use crate::core::config::Config;

/// Cell-network context sent with every geolocation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHints {
    #[serde(rename = "homeMobileCountryCode")]
    pub country_code: u32,
    #[serde(rename = "homeMobileNetworkCode")]
    pub network_code: u32,
    pub radio_type: String,
    pub carrier: String,
    /// Let the provider fall back to the caller's IP address.
    pub consider_ip: bool,
}

impl Default for NetworkHints {
    fn default() -> Self {
        Self {
            country_code: 310,
            network_code: 410,
            radio_type: "gsm".to_string(),
            carrier: "Vodafone".to_string(),
            consider_ip: true,
        }
    }
}

/// Receives every estimate the locator produces.
pub trait PositionObserver: Send + Sync {
    fn observe(&self, estimate: &PositionEstimate);
}

/// Default observer: one structured `tracing` event per estimate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PositionObserver for TracingObserver {
    fn observe(&self, estimate: &PositionEstimate) {
        info!(
            latitude = estimate.latitude,
            longitude = estimate.longitude,
            accuracy_meters = estimate.accuracy_meters,
            "Estimated device position"
        );
    }
}

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: LatLng,
    accuracy: f64,
}

/// Estimates the caller's position from network signals.
#[derive(Clone)]
pub struct DeviceLocator {
    client: Client,
    endpoint: String,
    api_key: String,
    hints: NetworkHints,
    observer: Arc<dyn PositionObserver>,
}

impl DeviceLocator {
    /// Create a locator that reports estimates through [`TracingObserver`].
    pub fn new(config: &Config) -> Result<Self, GeoError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        config: &Config,
        observer: Arc<dyn PositionObserver>,
    ) -> Result<Self, GeoError> {
        let timeout = Duration::from_secs(config.geo.request_timeout_secs);
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: config.geo.geolocate_url.clone(),
            api_key: config.credentials.google_api_key.clone(),
            hints: config.geo.network_hints.clone(),
            observer,
        })
    }

    pub fn hints(&self) -> &NetworkHints {
        &self.hints
    }

    /// Ask the provider where this device is.
    #[instrument(skip(self), fields(carrier = %self.hints.carrier))]
    pub async fn locate(&self) -> Result<PositionEstimate, GeoError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.hints)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(provider_error("geolocate", response).await);
        }

        let payload: GeolocateResponse = decode_json(response).await?;
        let estimate = PositionEstimate {
            latitude: payload.location.lat,
            longitude: payload.location.lng,
            accuracy_meters: payload.accuracy,
        };

        self.observer.observe(&estimate);
        Ok(estimate)
    }
}
