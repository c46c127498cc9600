//! On-disk configuration file handling.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform reports no home or config directory.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be encoded.
    #[error("cannot encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Locates, reads and writes `config.toml`.
#[derive(Debug, Clone)]
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoConfigDir`] when the platform has none.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::with_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoConfigDir)
    }

    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the configuration file, honoring an explicit override.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Reads the configuration.
    ///
    /// A missing file is created with the defaults. A file that does not
    /// parse is left untouched and the defaults are used.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Writing default configuration");
                let config = AppConfig::default();
                Self::save_config(&path, &config)?;
                return Ok(config);
            }
            Err(e) => return Err(ConfigError::io(&path, e)),
        };

        toml::from_str::<AppConfig>(&content).map_or_else(
            |e| {
                warn!(path = %path.display(), error = %e, "Malformed configuration, using defaults");
                Ok(AppConfig::default())
            },
            |config| {
                debug!(path = %path.display(), "Configuration loaded");
                Ok(config)
            },
        )
    }

    /// Atomically replaces `path` with `config`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if encoding or any file operation fails.
    pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| ConfigError::io(dir, e))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| ConfigError::io(staged.path(), e))?;
        staged
            .persist(path)
            .map_err(|e| ConfigError::io(path, e.error))?;
        Ok(())
    }
}
