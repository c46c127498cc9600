//! Per-URL async image loader.
//!
//! A loader owns the fetch lifecycle of one URL: it consults the shared
//! cache, spawns at most one fetch at a time, and publishes the result.
//! Fetch tasks never hold the loader itself. They report back through the
//! UI context's completion channel, tagged with the loader's id and a
//! ticket, and the UI context hands the completion to [`ImageLoader::complete`].
//! Only a completion whose ticket matches the outstanding fetch is applied,
//! so a cancelled fetch can never write the cache or the image.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Url;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::entities::LoaderState;
use crate::domain::errors::ImageError;
use crate::domain::ports::{ImageCachePort, ImageFetchPort};

static NEXT_LOADER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of an [`ImageLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoaderId(u64);

impl LoaderId {
    fn next() -> Self {
        Self(NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for LoaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "loader-{}", self.0)
    }
}

/// Outcome of one fetch, delivered to the UI context.
#[derive(Debug)]
pub struct FetchCompletion {
    loader: LoaderId,
    ticket: u64,
    url: Url,
    image: Option<Arc<image::DynamicImage>>,
}

impl FetchCompletion {
    /// Returns the loader this completion belongs to.
    #[must_use]
    pub const fn loader(&self) -> LoaderId {
        self.loader
    }

    /// Returns the fetched URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true if the fetch produced an image.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.image.is_some()
    }
}

/// Sending half of the UI context's completion channel.
pub type CompletionSender = mpsc::UnboundedSender<FetchCompletion>;
/// Receiving half of the UI context's completion channel.
pub type CompletionReceiver = mpsc::UnboundedReceiver<FetchCompletion>;

/// Dependencies shared by every loader: the cache, the fetcher and the
/// channel into the UI context.
#[derive(Clone)]
pub struct LoaderContext {
    cache: Option<Arc<dyn ImageCachePort>>,
    fetcher: Arc<dyn ImageFetchPort>,
    completions: CompletionSender,
}

impl LoaderContext {
    /// Creates a context without caching.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetchPort>, completions: CompletionSender) -> Self {
        Self {
            cache: None,
            fetcher,
            completions,
        }
    }

    /// Shares `cache` with every loader built from this context.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ImageCachePort>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the shared cache, if any.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<dyn ImageCachePort>> {
        self.cache.as_ref()
    }
}

impl std::fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderContext")
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

/// Outstanding fetch. Dropping it aborts the task.
struct InFlightFetch {
    ticket: u64,
    task: JoinHandle<()>,
}

impl Drop for InFlightFetch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Loads the image behind one URL.
pub struct ImageLoader {
    id: LoaderId,
    url: Url,
    context: LoaderContext,
    state: watch::Sender<LoaderState>,
    in_flight: Option<InFlightFetch>,
    next_ticket: u64,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ImageLoader")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("is_loading", &state.is_loading)
            .field("has_image", &state.has_image())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates an idle loader for `url`.
    #[must_use]
    pub fn new(url: Url, context: LoaderContext) -> Self {
        let (state, _) = watch::channel(LoaderState::default());
        Self {
            id: LoaderId::next(),
            url,
            context,
            state,
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Returns this loader's id.
    #[must_use]
    pub const fn id(&self) -> LoaderId {
        self.id
    }

    /// Returns the URL served by this loader.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true while a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Returns the current image.
    #[must_use]
    pub fn image(&self) -> Option<Arc<image::DynamicImage>> {
        self.state.borrow().image.clone()
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> LoaderState {
        self.state.borrow().clone()
    }

    /// Subscribes to state updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }

    /// Starts loading the image unless a fetch is already outstanding.
    ///
    /// A cache hit publishes the cached image immediately without touching
    /// the network. A miss spawns a fetch whose result arrives later as a
    /// [`FetchCompletion`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(&mut self) {
        if self.in_flight.is_some() {
            trace!(id = %self.id, url = %self.url, "Load already in progress");
            return;
        }

        if let Some(image) = self.context.cache.as_ref().and_then(|c| c.get(&self.url)) {
            debug!(id = %self.id, url = %self.url, source = "memory", "Image loaded");
            self.state.send_modify(|state| state.image = Some(image));
            return;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let task = tokio::spawn(run_fetch(
            self.id,
            ticket,
            self.url.clone(),
            Arc::clone(&self.context.fetcher),
            self.context.completions.clone(),
        ));

        self.in_flight = Some(InFlightFetch { ticket, task });
        self.state.send_modify(|state| state.is_loading = true);
        debug!(id = %self.id, url = %self.url, ticket, "Started image fetch");
    }

    /// Aborts the outstanding fetch, if any.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(id = %self.id, url = %self.url, ticket = in_flight.ticket, "Cancelled image fetch");
            drop(in_flight);
            self.state.send_modify(|state| state.is_loading = false);
        }
    }

    /// Applies a fetch outcome. Must run on the UI context.
    ///
    /// Returns false, changing nothing, when the completion belongs to
    /// another loader or to a fetch that was cancelled or superseded.
    pub fn complete(&mut self, completion: FetchCompletion) -> bool {
        if completion.loader != self.id {
            return false;
        }

        let ticket = completion.ticket;
        if self.in_flight.take_if(|f| f.ticket == ticket).is_none() {
            trace!(id = %self.id, ticket, "Discarding stale fetch completion");
            return false;
        }

        if let (Some(image), Some(cache)) = (&completion.image, &self.context.cache) {
            cache.set(self.url.clone(), Arc::clone(image));
        }

        if completion.image.is_some() {
            debug!(id = %self.id, url = %self.url, source = "network", "Image loaded");
        }

        self.state.send_modify(|state| {
            state.is_loading = false;
            state.image = completion.image;
        });
        true
    }
}

async fn run_fetch(
    loader: LoaderId,
    ticket: u64,
    url: Url,
    fetcher: Arc<dyn ImageFetchPort>,
    completions: CompletionSender,
) {
    let image = match fetch_and_decode(fetcher.as_ref(), &url).await {
        Ok(decoded) => Some(Arc::new(decoded)),
        Err(e) if e.is_network_error() => {
            debug!(id = %loader, url = %url, error = %e, "Image fetch failed");
            None
        }
        Err(e) => {
            warn!(id = %loader, url = %url, error = %e, "Image load failed");
            None
        }
    };

    let completion = FetchCompletion {
        loader,
        ticket,
        url,
        image,
    };
    if completions.send(completion).is_err() {
        trace!(id = %loader, "UI context gone, dropping fetch result");
    }
}

async fn fetch_and_decode(
    fetcher: &dyn ImageFetchPort,
    url: &Url,
) -> Result<image::DynamicImage, ImageError> {
    let bytes = fetcher.fetch(url).await?;

    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| ImageError::decode(format!("decode task failed: {e}")))?
        .map_err(|e| ImageError::decode(e.to_string()))
}
