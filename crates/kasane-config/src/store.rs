use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unknown setting: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// JSON settings file on disk
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `KASANE_CONFIG`, else `<config dir>/kasane/config.json`
    pub fn default_location() -> Self {
        if let Ok(path) = std::env::var("KASANE_CONFIG") {
            if !path.trim().is_empty() {
                return Self::new(path);
            }
        }

        let root = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(root.join("kasane").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load, reports missing and malformed files
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&data).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Startup load. Never fails: a missing or corrupt file yields defaults
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => {
                tracing::info!("Loaded settings from {}", self.path.display());
                config
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "No settings file at {}, using defaults",
                    self.path.display()
                );
                Config::default()
            }
            Err(e) => {
                tracing::warn!("{e}; falling back to defaults");
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let data = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        fs::write(&self.path, data).map_err(io_err)?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
