mod feed_port;
mod image_cache_port;
mod image_fetch_port;

#[cfg(test)]
pub use feed_port::MockFeedPort;
pub use feed_port::FeedPort;
pub use image_cache_port::ImageCachePort;
pub use image_fetch_port::ImageFetchPort;

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetch_port::mock::{MockImageFetcher, png_bytes};
}
