//! Domain layer with feed entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Attachment, LoaderState, Post, User};
pub use errors::{FeedError, ImageError};
pub use ports::{FeedPort, ImageCachePort, ImageFetchPort};
