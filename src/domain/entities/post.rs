use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{Attachment, User};
use crate::domain::serde_utils::epoch_seconds;

/// A single entry of the Scrapbook feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: String,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    attachments: Vec<Attachment>,
    #[serde(
        default,
        alias = "postedAt",
        deserialize_with = "epoch_seconds::deserialize"
    )]
    timestamp: Option<DateTime<Utc>>,
}

#[allow(missing_docs)]
impl Post {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user: None,
            text: text.into(),
            attachments: Vec::new(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Returns the URLs to request for this post's images, in attachment order.
    #[must_use]
    pub fn image_urls(&self) -> Vec<Url> {
        self.attachments
            .iter()
            .filter_map(Attachment::image_request)
            .collect()
    }

    /// Caption describing the attachment count, e.g. "1 attachment".
    #[must_use]
    pub fn attachment_caption(&self) -> String {
        let count = self.attachments.len();
        format!("{count} attachment{}", if count == 1 { "" } else { "s" })
    }
}
