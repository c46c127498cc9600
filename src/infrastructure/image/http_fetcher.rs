//! HTTP adapter for downloading image bytes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::domain::errors::ImageError;
use crate::domain::ports::ImageFetchPort;
use crate::infrastructure::config::ImageConfig;

const USER_AGENT: &str = concat!("scrapbook-tui/", env!("CARGO_PKG_VERSION"));

/// Downloads images over HTTP with a bounded number of concurrent requests.
pub struct HttpImageFetcher {
    client: Client,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for HttpImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageFetcher")
            .field("available_permits", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

impl HttpImageFetcher {
    /// Creates a fetcher from the image configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ImageConfig) -> Result<Self, ImageError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, config.max_concurrent_fetches))
    }

    /// Creates a fetcher around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, max_concurrent_fetches: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
        }
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes, ImageError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ImageError::network(format!("download pool closed: {e}")))?;

        trace!(url = %url, "Downloading image");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ImageError::network("request timed out")
            } else {
                ImageError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::network(format!("failed to read body: {e}")))?;

        debug!(url = %url, size = bytes.len(), "Downloaded image");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(response: &'static [u8]) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.ok();
        });
        Url::parse(&format!("http://{addr}/img.png")).unwrap()
    }

    fn local_fetcher() -> HttpImageFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpImageFetcher::with_client(client, 2)
    }

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpImageFetcher::new(&ImageConfig::default());
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4\r\nConnection: close\r\n\r\nabcd",
        )
        .await;
        let fetcher = local_fetcher();

        let bytes = fetcher.fetch(&url).await.unwrap();
        assert_eq!(&bytes[..], b"abcd");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let fetcher = local_fetcher();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert_eq!(err, ImageError::Status { status: 404 });
        assert!(err.is_network_error());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = local_fetcher();
        let url = Url::parse(&format!("http://{addr}/img.png")).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ImageError::Network { .. }));
    }
}
