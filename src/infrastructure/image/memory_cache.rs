//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use reqwest::Url;
use tracing::{debug, trace};

use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// In-memory LRU cache for decoded images, shared by every loader.
///
/// Lookups and stores hold the lock only for the map operation itself, so
/// concurrent completions never observe a half-updated cache.
pub struct MemoryImageCache {
    cache: Mutex<LruCache<Url, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an image without promoting it in the LRU or counting a hit.
    #[must_use]
    pub fn peek(&self, url: &Url) -> Option<Arc<image::DynamicImage>> {
        self.cache.lock().peek(url).cloned()
    }

    /// Drops every entry in response to memory pressure.
    pub fn purge(&self) {
        let dropped = {
            let mut cache = self.cache.lock();
            let len = cache.len();
            cache.clear();
            len
        };
        debug!(dropped, "Purged memory image cache");
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ImageCachePort for MemoryImageCache {
    fn get(&self, url: &Url) -> Option<Arc<image::DynamicImage>> {
        let found = self.cache.lock().get(url).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory cache miss");
        }
        found
    }

    fn set(&self, url: Url, image: Arc<image::DynamicImage>) {
        debug!(url = %url, "Storing image in memory cache");
        if let Some((evicted, _)) = self.cache.lock().push(url, image) {
            trace!(url = %evicted, "Memory cache entry replaced or evicted");
        }
    }

    fn remove(&self, url: &Url) {
        if self.cache.lock().pop(url).is_some() {
            debug!(url = %url, "Removed image from memory cache");
        }
    }

    fn len(&self) -> usize {
        self.cache.lock().len()
    }

    fn clear(&self) {
        self.purge();
    }
}
