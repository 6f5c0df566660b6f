//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables on top of defaults. Loading a `.env` file is left to
//! the binary.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::geo::{
    DEFAULT_GEOCODE_URL, DEFAULT_GEOLOCATE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCHEME_PREFIX, NetworkHints,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variables checked, in order, for the Google Maps API key.
const API_KEY_VARS: [&str; 2] = ["MCP_GOOGLE_API_KEY", "GOOGLE_API_KEY"];

/// Main configuration structure for the MCP server.
///
/// Built once at startup and shared read-only for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Upstream provider endpoints and request settings.
    pub geo: GeoConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Google Maps Platform key, used for both geocoding and geolocation.
    pub google_api_key: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "google_api_key",
                &(!self.google_api_key.is_empty()).then_some("[REDACTED]"),
            )
            .finish()
    }
}

/// Provider endpoints, timeouts and request hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Geocoding endpoint (address lookup).
    pub geocode_url: String,

    /// Network geolocation endpoint.
    pub geolocate_url: String,

    /// Timeout applied to each outbound request.
    pub request_timeout_secs: u64,

    /// Cell-network context sent to the geolocation provider.
    pub network_hints: NetworkHints,

    /// Prefix of generated ride deep links, e.g. `uber://?`.
    pub deep_link_scheme: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            geolocate_url: DEFAULT_GEOLOCATE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            network_hints: NetworkHints::default(),
            deep_link_scheme: DEFAULT_SCHEME_PREFIX.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "ride-link-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            geo: GeoConfig::default(),
        }
    }
}

impl Config {
    /// Create a default configuration using the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.credentials.google_api_key = api_key.into();
        config
    }

    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `MCP_` (e.g. `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`). The API key is required: a missing or blank key is a
    /// configuration error so the process fails at startup rather than on the
    /// first tool call.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config.credentials.google_api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "Google Maps API key is not set (expected one of: {})",
                    API_KEY_VARS.join(", ")
                ))
            })?;
        info!("Google Maps API key loaded from environment");

        config.geo = GeoConfig::from_env()?;

        Ok(config)
    }
}

impl GeoConfig {
    fn from_env() -> Result<Self> {
        let mut geo = Self::default();

        if let Ok(url) = std::env::var("MCP_GEOCODE_URL") {
            warn!("Using non-default geocoding endpoint: {}", url);
            geo.geocode_url = url;
        }

        if let Ok(url) = std::env::var("MCP_GEOLOCATE_URL") {
            warn!("Using non-default geolocation endpoint: {}", url);
            geo.geolocate_url = url;
        }

        if let Some(secs) = parse_var::<u64>("MCP_REQUEST_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(Error::config("MCP_REQUEST_TIMEOUT_SECS must be greater than 0"));
            }
            geo.request_timeout_secs = secs;
        }

        if let Some(mcc) = parse_var("MCP_GEO_MCC")? {
            geo.network_hints.country_code = mcc;
        }

        if let Some(mnc) = parse_var("MCP_GEO_MNC")? {
            geo.network_hints.network_code = mnc;
        }

        if let Ok(radio_type) = std::env::var("MCP_GEO_RADIO_TYPE") {
            geo.network_hints.radio_type = radio_type;
        }

        if let Ok(carrier) = std::env::var("MCP_GEO_CARRIER") {
            geo.network_hints.carrier = carrier;
        }

        if let Some(consider_ip) = parse_var("MCP_GEO_CONSIDER_IP")? {
            geo.network_hints.consider_ip = consider_ip;
        }

        if let Ok(scheme) = std::env::var("MCP_DEEP_LINK_SCHEME") {
            info!("Deep link scheme overridden: {}", scheme);
            geo.deep_link_scheme = scheme;
        }

        Ok(geo)
    }
}

/// Parse an optional environment variable, rejecting unparsable values.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("Invalid value for {}: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Serializes every test that reads or writes the process environment.
#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
