use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::{GestureConfig, DEFAULT_COMMIT_RATIO, DEFAULT_TILE_SIZE};
use crate::persistence;
use crate::puzzle::MIN_SIZE;

/// Largest board whose labels still fit the terminal layout.
pub const MAX_SIZE: usize = 15;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tiles per row and column.
    pub size: usize,
    /// Span of one tile in pointer units.
    pub tile_size: f32,
    /// Share of a tile a drag must cover to commit.
    pub commit_ratio: f32,
    /// Where the current game is saved.
    pub save_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 4,
            tile_size: DEFAULT_TILE_SIZE,
            commit_ratio: DEFAULT_COMMIT_RATIO,
            save_path: None,
        }
    }
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `dirs::config_dir()/slide-puzzle/config.toml`, falling back to the
    /// current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("slide-puzzle").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "size must be between {} and {}, got {}",
                    MIN_SIZE, MAX_SIZE, self.size
                ),
            });
        }

        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::ValidationError {
                message: format!("tile_size must be positive, got {}", self.tile_size),
            });
        }

        if !(self.commit_ratio > 0.0 && self.commit_ratio <= 1.0) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "commit_ratio must be in (0, 1], got {}",
                    self.commit_ratio
                ),
            });
        }

        Ok(())
    }

    pub fn gesture(&self) -> GestureConfig {
        GestureConfig {
            tile_size: self.tile_size,
            commit_ratio: self.commit_ratio,
        }
    }

    /// Configured save file, or the platform default.
    pub fn save_path(&self) -> PathBuf {
        self.save_path
            .clone()
            .unwrap_or_else(persistence::default_path)
    }
}
