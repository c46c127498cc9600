//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::infrastructure::image::DEFAULT_CACHE_SIZE;

pub(super) const APP_NAME: &str = "scrapbook";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "hackclub";

/// Default Scrapbook feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://scrapbook.hackclub.com/api/posts/";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from TOML and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Feed endpoint configuration.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Image pipeline configuration.
    #[serde(default)]
    pub images: ImageConfig,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Feed endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL returning the JSON array of posts.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Image pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Maximum number of decoded images kept in memory.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum concurrent downloads.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Download timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Text shown while an image is not available.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            timeout_secs: default_timeout_secs(),
            placeholder: default_placeholder(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Load and show author avatars next to each post.
    #[serde(default)]
    pub show_avatars: bool,

    /// Height in terminal rows of the attachment image row.
    #[serde(default = "default_image_height")]
    pub image_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_avatars: false,
            image_height: default_image_height(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_SIZE
}

const fn default_max_concurrent_fetches() -> usize {
    4
}

fn default_placeholder() -> String {
    "Loading…".to_string()
}

const fn default_image_height() -> u16 {
    10
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(feed_url) = args.feed_url {
            self.feed.url = feed_url;
        }
        if let Some(capacity) = args.cache_capacity {
            self.images.cache_capacity = capacity;
        }
        if let Some(max) = args.max_concurrent_fetches {
            self.images.max_concurrent_fetches = max;
        }
        if let Some(timeout) = args.image_timeout {
            self.images.timeout_secs = timeout;
        }
        if let Some(show_avatars) = args.show_avatars {
            self.ui.show_avatars = show_avatars;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("scrapbook.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            feed: FeedConfig::default(),
            images: ImageConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [feed]
            url = "http://localhost:8080/posts"

            [images]
            cache_capacity = 8

            [ui]
            show_avatars = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.feed.url, "http://localhost:8080/posts");
        assert_eq!(config.feed.timeout_secs, 30);
        assert_eq!(config.images.cache_capacity, 8);
        assert_eq!(config.images.max_concurrent_fetches, 4);
        assert_eq!(config.images.placeholder, "Loading…");
        assert!(config.ui.show_avatars);
        assert_eq!(config.ui.image_height, 10);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.images.cache_capacity, DEFAULT_CACHE_SIZE);
        assert!(!config.ui.show_avatars);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "scrapbook",
            "--feed-url",
            "http://example.test/feed",
            "--cache-capacity",
            "3",
            "--log-level",
            "trace",
            "--show-avatars",
            "true",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.feed.url, "http://example.test/feed");
        assert_eq!(config.images.cache_capacity, 3);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert!(config.ui.show_avatars);
        assert_eq!(config.images.max_concurrent_fetches, 4);
    }
}
