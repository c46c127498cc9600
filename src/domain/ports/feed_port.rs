//! Feed retrieval port definition.

use async_trait::async_trait;

use crate::domain::entities::Post;
use crate::domain::errors::FeedError;

/// Port for retrieving the Scrapbook feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedPort: Send + Sync {
    /// Fetches and decodes the current list of posts.
    async fn fetch_posts(&self) -> Result<Vec<Post>, FeedError>;
}
