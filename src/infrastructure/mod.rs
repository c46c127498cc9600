//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, downloading, per-URL loading).
pub mod image;
/// Scrapbook feed client.
pub mod scrapbook;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use self::image::{
    CacheStats, FetchCompletion, HttpImageFetcher, ImageLoader, LoaderContext, LoaderId,
    MemoryImageCache,
};
pub use scrapbook::ScrapbookClient;
