//! Value types produced by the geo components.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical address string as returned by the provider.
    pub formatted_address: String,
}

/// A network-based estimate of the caller's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionEstimate {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the 95% confidence circle, in meters.
    pub accuracy_meters: f64,
}

impl PositionEstimate {
    /// `[latitude, longitude, accuracy_meters]`, the shape returned to tool callers.
    pub fn as_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.accuracy_meters]
    }
}

/// A ride-booking deep link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RideDeepLink(String);

impl RideDeepLink {
    pub(crate) fn new(uri: String) -> Self {
        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RideDeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
