use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::errors::ImageError;

/// One resolution variant of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

impl Thumbnail {
    /// Creates a new thumbnail.
    #[must_use]
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// Returns the raw URL string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the declared width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the declared height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Parses the URL as an absolute URL.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidUrl`] when the URL is relative or malformed.
    pub fn parsed_url(&self) -> Result<Url, ImageError> {
        Url::parse(&self.url).map_err(|e| ImageError::invalid_url(&self.url, e.to_string()))
    }
}

/// Thumbnail variants of an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ThumbnailCollection {
    #[serde(default)]
    pub small: Option<Thumbnail>,
    #[serde(default)]
    pub large: Option<Thumbnail>,
    #[serde(default)]
    pub full: Option<Thumbnail>,
}

/// Media item attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "type", default)]
    mime_type: String,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    thumbnails: Option<ThumbnailCollection>,
}

#[allow(missing_docs)]
impl Attachment {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            mime_type: mime_type.into(),
            filename: filename.into(),
            thumbnails: None,
        }
    }

    #[must_use]
    pub fn with_thumbnails(mut self, thumbnails: ThumbnailCollection) -> Self {
        self.thumbnails = Some(thumbnails);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub const fn thumbnails(&self) -> Option<&ThumbnailCollection> {
        self.thumbnails.as_ref()
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Returns the URL of the large thumbnail, if present and well formed.
    #[must_use]
    pub fn large_url(&self) -> Option<Url> {
        let large = self.thumbnails.as_ref()?.large.as_ref()?;
        match large.parsed_url() {
            Ok(url) => Some(url),
            Err(e) => {
                trace!(attachment = %self.id, error = %e, "Ignoring malformed thumbnail URL");
                None
            }
        }
    }

    /// Returns the URL to request for display, or `None` when this
    /// attachment must not generate a fetch.
    #[must_use]
    pub fn image_request(&self) -> Option<Url> {
        if self.is_image() {
            self.large_url()
        } else {
            None
        }
    }
}
