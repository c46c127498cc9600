use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "scrapbook",
    version,
    about = "A terminal viewer for the Hack Club Scrapbook feed",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Feed endpoint URL.
    #[arg(long, value_name = "URL", env = "SCRAPBOOK_FEED_URL")]
    pub feed_url: Option<String>,

    /// Maximum number of decoded images kept in memory.
    #[arg(long, value_name = "COUNT")]
    pub cache_capacity: Option<usize>,

    /// Maximum concurrent image downloads.
    #[arg(long, value_name = "COUNT")]
    pub max_concurrent_fetches: Option<usize>,

    /// Image download timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub image_timeout: Option<u64>,

    /// Show author avatars.
    #[arg(long)]
    pub show_avatars: Option<bool>,
}
