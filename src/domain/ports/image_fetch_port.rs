//! Port definition for downloading image bytes.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::domain::errors::ImageError;

/// Port for retrieving the raw bytes behind an image URL.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the bytes at `url`.
    ///
    /// Transport errors and non-success statuses are both failures.
    async fn fetch(&self, url: &Url) -> Result<Bytes, ImageError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use tokio::sync::Semaphore;

    /// Encodes a small PNG for use as a fetch response.
    pub fn png_bytes(width: u32, height: u32) -> Bytes {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("encode test png");
        Bytes::from(buf)
    }

    /// Mock fetcher recording every request.
    ///
    /// Unknown URLs answer with a 2x2 PNG. When gated, each fetch waits for
    /// a permit released through [`MockImageFetcher::release`].
    pub struct MockImageFetcher {
        responses: Mutex<HashMap<String, Result<Bytes, ImageError>>>,
        requests: Mutex<Vec<Url>>,
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl MockImageFetcher {
        /// Creates a fetcher that answers immediately.
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        /// Creates a fetcher whose requests stay outstanding until released.
        pub fn gated() -> Self {
            Self {
                gate: Some(Arc::new(Semaphore::new(0))),
                ..Self::new()
            }
        }

        /// Sets the response for a URL.
        pub fn respond(&self, url: &str, response: Result<Bytes, ImageError>) {
            self.responses.lock().insert(url.to_string(), response);
        }

        /// Lets `count` outstanding fetches finish.
        pub fn release(&self, count: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(count);
            }
        }

        /// Returns the number of fetches started.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Returns every requested URL in order.
        pub fn requests(&self) -> Vec<Url> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl ImageFetchPort for MockImageFetcher {
        async fn fetch(&self, url: &Url) -> Result<Bytes, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(url.clone());

            if let Some(gate) = &self.gate {
                gate.acquire()
                    .await
                    .map_err(|e| ImageError::network(e.to_string()))?
                    .forget();
            }

            self.responses
                .lock()
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(png_bytes(2, 2)))
        }
    }
}
