//! Scrapbook feed HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::entities::Post;
use crate::domain::errors::FeedError;
use crate::domain::ports::FeedPort;
use crate::infrastructure::config::FeedConfig;

const USER_AGENT: &str = concat!("scrapbook-tui/", env!("CARGO_PKG_VERSION"));

/// Client for the Scrapbook posts endpoint.
pub struct ScrapbookClient {
    client: Client,
    feed_url: String,
}

impl ScrapbookClient {
    /// Creates a client for the configured feed.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, config.url.clone()))
    }

    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }

    /// Returns the feed endpoint.
    #[must_use]
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
}

#[async_trait]
impl FeedPort for ScrapbookClient {
    async fn fetch_posts(&self) -> Result<Vec<Post>, FeedError> {
        debug!(url = %self.feed_url, "Fetching feed");

        let response = self.client.get(&self.feed_url).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach feed endpoint");
            if e.is_timeout() {
                FeedError::network("request timed out")
            } else if e.is_connect() {
                FeedError::network("failed to connect to feed endpoint")
            } else {
                FeedError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::network(format!("failed to read body: {e}")))?;

        let posts: Vec<Post> = serde_json::from_slice(&body)?;
        debug!(count = posts.len(), "Feed decoded");
        Ok(posts)
    }
}
