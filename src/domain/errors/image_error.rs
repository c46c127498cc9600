//! Image pipeline error types.

use thiserror::Error;

/// Reasons an image could not be produced.
///
/// These never leave the loader: every variant is shown as "no image".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("invalid image URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ImageError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether the failure happened on the wire.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
