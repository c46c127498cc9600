//! Domain types for image loading.

use std::sync::Arc;

/// Observable state of a per-URL image loader.
///
/// A loader is `idle` when `is_loading` is false and `loading` otherwise;
/// there are no other states.
#[derive(Debug, Clone, Default)]
pub struct LoaderState {
    /// True between fetch start and fetch completion or cancellation.
    pub is_loading: bool,
    /// The most recently produced image.
    pub image: Option<Arc<image::DynamicImage>>,
}

impl LoaderState {
    /// Returns true if an image is available for display.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
