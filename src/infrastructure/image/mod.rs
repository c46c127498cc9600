//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction
//! - HTTP downloads with a bounded number of concurrent requests
//! - Per-URL async loaders with cancellation

pub mod http_fetcher;
pub mod loader;
pub mod memory_cache;

pub use http_fetcher::HttpImageFetcher;
pub use loader::{
    CompletionReceiver, CompletionSender, FetchCompletion, ImageLoader, LoaderContext, LoaderId,
};
pub use memory_cache::{CacheStats, DEFAULT_CACHE_SIZE, MemoryImageCache};
