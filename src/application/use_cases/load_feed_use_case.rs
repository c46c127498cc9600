//! Feed loading use case.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::Post;
use crate::domain::ports::FeedPort;

/// Loads the feed, absorbing every failure.
pub struct LoadFeedUseCase {
    feed_port: Arc<dyn FeedPort>,
}

impl LoadFeedUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(feed_port: Arc<dyn FeedPort>) -> Self {
        Self { feed_port }
    }

    /// Fetches the posts.
    ///
    /// Returns `None` when the feed could not be retrieved or decoded; the
    /// failure is logged and the caller keeps its post list empty.
    pub async fn execute(&self) -> Option<Vec<Post>> {
        match self.feed_port.fetch_posts().await {
            Ok(posts) => {
                info!(count = posts.len(), "Feed loaded");
                Some(posts)
            }
            Err(e) => {
                warn!(error = %e, recoverable = e.is_recoverable(), "Failed to load feed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FeedError;
    use crate::domain::ports::MockFeedPort;

    #[test]
    fn test_returns_posts() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts()
            .times(1)
            .returning(|| Ok(vec![Post::new("p1", "hello"), Post::new("p2", "world")]));

        let use_case = LoadFeedUseCase::new(Arc::new(port));
        let posts = tokio_test::block_on(use_case.execute()).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].text(), "world");
    }

    #[test]
    fn test_network_failure_yields_none() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts()
            .times(1)
            .returning(|| Err(FeedError::network("connection reset")));

        let use_case = LoadFeedUseCase::new(Arc::new(port));
        assert!(tokio_test::block_on(use_case.execute()).is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_yields_none() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts().times(1).returning(|| {
            let err = serde_json::from_str::<Vec<Post>>("{").unwrap_err();
            Err(FeedError::Decode(err))
        });

        let use_case = LoadFeedUseCase::new(Arc::new(port));
        assert!(use_case.execute().await.is_none());
    }
}
