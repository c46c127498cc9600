//! Port definition for image caching.

use std::sync::Arc;

use reqwest::Url;

/// Process-wide, best-effort store of decoded images keyed by absolute URL.
///
/// Implementations must be thread-safe. Entries may disappear at any time,
/// so a hit on one lookup says nothing about the next.
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    /// Returns None if not cached.
    fn get(&self, url: &Url) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image, overwriting any previous entry for the URL.
    fn set(&self, url: Url, image: Arc<image::DynamicImage>);

    /// Removes an image from the cache.
    fn remove(&self, url: &Url);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    fn clear(&self);
}
