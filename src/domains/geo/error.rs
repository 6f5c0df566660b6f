//! Geo-specific error types.

use thiserror::Error;

/// Errors raised by the address resolver, the deep-link builder and the
/// device locator.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The request never produced a response (connection failure, timeout, ...).
    #[error("Transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("Provider error (HTTP {status}): {body}")]
    Provider { status: u16, body: String },

    /// The provider answered successfully but matched nothing.
    #[error("Address not found: {address}")]
    NotFound { address: String },

    /// The provider answered successfully but the payload is unusable.
    #[error("Invalid provider response: {message}")]
    InvalidResponse { message: String },

    /// A caller handed malformed input to a component.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl GeoError {
    /// Create a new "provider" error.
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }

    /// Create a new "not found" error.
    pub fn not_found(address: impl Into<String>) -> Self {
        Self::NotFound {
            address: address.into(),
        }
    }

    /// Create a new "invalid response" error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new "precondition" error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// HTTP status reported by the provider, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            Self::Transport { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source } if source.is_timeout())
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }
}
