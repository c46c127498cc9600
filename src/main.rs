use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use scrapbook::infrastructure::{
    AppConfig, CliArgs, HttpImageFetcher, MemoryImageCache, ScrapbookClient, StorageManager,
};
use scrapbook::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app() -> Result<App> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = scrapbook::VERSION,
        feed = %config.feed.url,
        cache_capacity = config.images.cache_capacity,
        "Starting Scrapbook"
    );

    let cache = Arc::new(MemoryImageCache::new(config.images.cache_capacity));
    let fetcher = Arc::new(HttpImageFetcher::new(&config.images)?);
    let feed = Arc::new(ScrapbookClient::new(&config.feed)?);

    Ok(App::new(feed, fetcher, cache, &config))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
