//! Ride-booking deep links.
//!
//! A link asks the ride app to open its booking screen with pickup at the
//! device's current location and the dropoff prefilled:
//!
//! ```text
//! uber://?action=setPickup&pickup=my_location&dropoff%5Bformatted_address%5D=...&dropoff%5Blatitude%5D=...&dropoff%5Blongitude%5D=...
//! ```

use super::GeoError;
use super::models::{LocationRecord, RideDeepLink};

/// Uber's app scheme.
pub const DEFAULT_SCHEME_PREFIX: &str = "uber://?";

const SET_PICKUP_ACTION: &str = "setPickup";
const CURRENT_LOCATION_SENTINEL: &str = "my_location";

/// Builds provider deep links from resolved locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideLinkBuilder {
    scheme_prefix: String,
    action: String,
    pickup: String,
}

impl RideLinkBuilder {
    /// Builder for an arbitrary scheme prefix (e.g. `"lyft://ridetype?"`).
    pub fn new(scheme_prefix: impl Into<String>) -> Self {
        Self {
            scheme_prefix: scheme_prefix.into(),
            action: SET_PICKUP_ACTION.to_string(),
            pickup: CURRENT_LOCATION_SENTINEL.to_string(),
        }
    }

    pub fn uber() -> Self {
        Self::new(DEFAULT_SCHEME_PREFIX)
    }

    /// Replace the `action` parameter (`setPickup` by default).
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Replace the pickup sentinel (`my_location` by default).
    pub fn with_pickup(mut self, pickup: impl Into<String>) -> Self {
        self.pickup = pickup.into();
        self
    }

    pub fn scheme_prefix(&self) -> &str {
        &self.scheme_prefix
    }

    /// Encode `location` as the dropoff of a pickup-here booking.
    ///
    /// Parameter order is fixed: action, pickup, dropoff address, latitude, longitude.
    pub fn build(&self, location: &LocationRecord) -> Result<RideDeepLink, GeoError> {
        Self::check(location)?;

        // `{:?}` keeps a fractional part on whole numbers (`37.0`, not `37`).
        let latitude = format!("{:?}", location.latitude);
        let longitude = format!("{:?}", location.longitude);
        let params = [
            ("action", self.action.as_str()),
            ("pickup", self.pickup.as_str()),
            ("dropoff[formatted_address]", location.formatted_address.as_str()),
            ("dropoff[latitude]", latitude.as_str()),
            ("dropoff[longitude]", longitude.as_str()),
        ];

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| GeoError::precondition(format!("unencodable location: {e}")))?;

        Ok(RideDeepLink::new(format!("{}{}", self.scheme_prefix, query)))
    }

    fn check(location: &LocationRecord) -> Result<(), GeoError> {
        if location.formatted_address.trim().is_empty() {
            return Err(GeoError::precondition("formatted address must not be empty"));
        }
        if !location.latitude.is_finite() || !(-90.0..=90.0).contains(&location.latitude) {
            return Err(GeoError::precondition(format!(
                "latitude out of range: {}",
                location.latitude
            )));
        }
        if !location.longitude.is_finite() || !(-180.0..=180.0).contains(&location.longitude) {
            return Err(GeoError::precondition(format!(
                "longitude out of range: {}",
                location.longitude
            )));
        }
        Ok(())
    }
}

impl Default for RideLinkBuilder {
    fn default() -> Self {
        Self::uber()
    }
}
