//! Configuration management for gesture-collector.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        LabelsConfig, MAX_RATE_HZ, SamplingConfig, StorageConfig, TransferConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session, artifact and log locations.
    pub storage: StorageConfig,
    /// Motion sampling settings.
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Session labelling settings.
    #[serde(default)]
    pub labels: LabelsConfig,
    /// Companion transfer settings.
    pub transfer: TransferConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default one if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Self::load_or_create(&config_dir.join("config.toml"), proj_dirs.data_dir())
    }

    /// Load configuration from `config_path`, or write defaults rooted at
    /// `data_dir` there if the file does not exist.
    #[track_caller]
    #[instrument]
    pub fn load_or_create(config_path: &Path, data_dir: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            info!("No config found, creating default");
            let config = Self::defaults(data_dir);
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Default configuration with every directory under `data_dir`.
    pub fn defaults(data_dir: &Path) -> Self {
        Config {
            storage: StorageConfig {
                data_root: data_dir.join("sessions"),
                temp_dir: std::env::temp_dir(),
                log_dir: data_dir.join("logs"),
            },
            sampling: SamplingConfig::default(),
            labels: LabelsConfig::default(),
            transfer: TransferConfig {
                outbox_dir: data_dir.join("outbox"),
            },
        }
    }

    /// Reject settings the recorder cannot work with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let rate = self.sampling.rate_hz;
        if !(1.0..=MAX_RATE_HZ).contains(&rate) {
            return Err(AppError::ConfigError {
                reason: format!(
                    "sampling.rate_hz must be between 1 and {}, got {}",
                    MAX_RATE_HZ, rate
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Save configuration using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Platform config file location, for display.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "gesture-collector", "Gesture-Collector").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
