//! Visibility-driven image view backed by an [`ImageLoader`].

use std::sync::Arc;

use image::DynamicImage;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, StatefulWidget, Widget};
use ratatui_image::picker::{Capability, Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{Resize, StatefulImage};
use reqwest::Url;

use crate::infrastructure::image::{FetchCompletion, ImageLoader, LoaderContext, LoaderId};

/// What an image view currently shows.
#[derive(Debug, Clone)]
pub enum ImageContent<'a> {
    /// The decoded image.
    Image(Arc<DynamicImage>),
    /// Placeholder text while no image is available.
    Placeholder(&'a str),
}

impl ImageContent<'_> {
    /// Returns true if the image is shown.
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

/// Image view that loads on appearance and cancels on disappearance.
///
/// Owns exactly one loader; dropping the view drops the loader and aborts
/// any outstanding fetch.
pub struct AsyncImage {
    loader: ImageLoader,
    placeholder: String,
    visible: bool,
    protocol: Option<(Arc<DynamicImage>, StatefulProtocol)>,
}

impl AsyncImage {
    /// Creates a hidden view for `url`.
    #[must_use]
    pub fn new(url: Url, context: LoaderContext, placeholder: impl Into<String>) -> Self {
        Self {
            loader: ImageLoader::new(url, context),
            placeholder: placeholder.into(),
            visible: false,
            protocol: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> LoaderId {
        self.loader.id()
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        self.loader.url()
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Marks the view visible, starting a load on the hidden to visible edge.
    pub fn on_appear(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.loader.load();
    }

    /// Marks the view hidden and cancels any outstanding fetch.
    ///
    /// An image that already arrived stays displayed.
    pub fn on_disappear(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.loader.cancel();
    }

    /// Forwards a fetch completion to the loader.
    pub fn handle_completion(&mut self, completion: FetchCompletion) -> bool {
        self.loader.complete(completion)
    }

    /// Returns the content to display.
    #[must_use]
    pub fn content(&self) -> ImageContent<'_> {
        self.loader.image().map_or_else(
            || ImageContent::Placeholder(&self.placeholder),
            ImageContent::Image,
        )
    }

    /// Renders the image, or the placeholder when none is available.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, picker: &Picker) {
        if area.is_empty() {
            return;
        }

        let Some(image) = self.loader.image() else {
            self.protocol = None;
            Paragraph::new(self.placeholder.as_str())
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .render(area, buf);
            return;
        };

        let stale = self
            .protocol
            .as_ref()
            .is_none_or(|(source, _)| !Arc::ptr_eq(source, &image));
        if stale {
            let protocol = picker.new_resize_protocol((*image).clone());
            self.protocol = Some((image, protocol));
        }

        if let Some((_, protocol)) = self.protocol.as_mut() {
            StatefulImage::default()
                .resize(Resize::Fit(None))
                .render(area, buf, protocol);
        }
    }
}

impl std::fmt::Debug for AsyncImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncImage")
            .field("id", &self.loader.id())
            .field("url", &self.loader.url().as_str())
            .field("visible", &self.visible)
            .field("has_protocol", &self.protocol.is_some())
            .finish_non_exhaustive()
    }
}

/// Terminal graphics protocol selection.
pub struct ImageManager {
    picker: Picker,
}

impl ImageManager {
    /// Queries the terminal for its graphics capabilities.
    ///
    /// Must run after the terminal entered raw mode and before the event
    /// stream starts reading stdin.
    #[must_use]
    pub fn new() -> Self {
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());

        let caps = picker.capabilities();
        let has_sixel = caps.iter().any(|c| matches!(c, Capability::Sixel));
        let has_kitty = caps.iter().any(|c| matches!(c, Capability::Kitty));

        if has_sixel && !has_kitty && picker.protocol_type() == ProtocolType::Halfblocks {
            picker.set_protocol_type(ProtocolType::Sixel);
        }

        Self { picker }
    }

    /// Unicode half block rendering, usable without a terminal.
    #[must_use]
    pub fn halfblocks() -> Self {
        Self {
            picker: Picker::halfblocks(),
        }
    }

    #[must_use]
    pub fn protocol_type(&self) -> ProtocolType {
        self.picker.protocol_type()
    }

    #[must_use]
    pub const fn picker(&self) -> &Picker {
        &self.picker
    }
}

impl Default for ImageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ImageCachePort;
    use crate::domain::ports::mocks::MockImageFetcher;
    use crate::infrastructure::image::MemoryImageCache;
    use tokio::sync::mpsc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn view(
        fetcher: &Arc<MockImageFetcher>,
        cache: &Arc<MemoryImageCache>,
    ) -> (AsyncImage, mpsc::UnboundedReceiver<FetchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let context = LoaderContext::new(fetcher.clone(), tx).with_cache(cache.clone());
        (
            AsyncImage::new(url("https://x/img.png"), context, "Loading…"),
            rx,
        )
    }

    #[tokio::test]
    async fn test_appear_loads_and_shows_image() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let cache = Arc::new(MemoryImageCache::new(4));
        let (mut image, mut rx) = view(&fetcher, &cache);

        assert!(matches!(image.content(), ImageContent::Placeholder("Loading…")));

        image.on_appear();
        assert!(image.is_visible());
        assert!(image.is_loading());

        let completion = rx.recv().await.unwrap();
        assert!(image.handle_completion(completion));
        assert!(image.content().is_image());
        assert!(!image.is_loading());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_appear_fetches_once() {
        let fetcher = Arc::new(MockImageFetcher::gated());
        let cache = Arc::new(MemoryImageCache::new(4));
        let (mut image, _rx) = view(&fetcher, &cache);

        image.on_appear();
        image.on_appear();
        image.on_appear();
        fetcher.release(1);
        tokio::task::yield_now().await;

        assert!(fetcher.calls() <= 1);
        assert!(image.is_loading());
    }

    #[tokio::test]
    async fn test_disappear_cancels_pending_fetch() {
        let fetcher = Arc::new(MockImageFetcher::gated());
        let cache = Arc::new(MemoryImageCache::new(4));
        let (mut image, _rx) = view(&fetcher, &cache);

        image.on_appear();
        image.on_disappear();

        assert!(!image.is_visible());
        assert!(!image.is_loading());
        assert!(!image.content().is_image());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_reappear_served_from_cache() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let cache = Arc::new(MemoryImageCache::new(4));
        let (mut image, mut rx) = view(&fetcher, &cache);

        image.on_appear();
        let completion = rx.recv().await.unwrap();
        image.handle_completion(completion);
        image.on_disappear();
        assert!(image.content().is_image());

        image.on_appear();
        assert!(image.content().is_image());
        assert!(!image.is_loading());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_render_placeholder_and_image() {
        let fetcher = Arc::new(MockImageFetcher::new());
        let cache = Arc::new(MemoryImageCache::new(4));
        let (mut image, mut rx) = view(&fetcher, &cache);
        let manager = ImageManager::halfblocks();
        let area = Rect::new(0, 0, 20, 3);

        let mut buf = Buffer::empty(area);
        image.render(area, &mut buf, manager.picker());
        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.contains("Loading…"));

        image.on_appear();
        let completion = rx.recv().await.unwrap();
        image.handle_completion(completion);

        let mut buf = Buffer::empty(area);
        image.render(area, &mut buf, manager.picker());
        assert!(image.protocol.is_some());
    }

    #[test]
    fn test_halfblocks_manager() {
        let manager = ImageManager::halfblocks();
        assert_eq!(manager.protocol_type(), ProtocolType::Halfblocks);
    }
}
