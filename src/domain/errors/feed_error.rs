//! Feed retrieval error types.

use thiserror::Error;

/// Feed retrieval error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FeedError {
    #[error("network error while fetching feed: {message}")]
    Network { message: String },

    #[error("feed endpoint responded with HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode feed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FeedError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns whether retrying later could succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status } => *status >= 500 || *status == 429,
            Self::Decode(_) => false,
        }
    }
}
