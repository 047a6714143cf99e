//! Cleanup configuration loaded from TOML files.
//!
//! The config file supplies a default target directory and default filter
//! criteria, so routine cleanups can run as a bare `sweepdir clean`. CLI
//! flags override individual fields.
//!
//! # Configuration File Format
//!
//! ```toml
//! [clean]
//! target_path = "/var/spool/reports"
//!
//! [clean.filters]
//! name_prefix = "report-"
//! extensions = ["log", "csv"]
//! max_age = "30d"
//! reference_date = "2024-03-10"
//! date_format = "%Y-%m-%d"
//! retention_depth = "5d"
//! ```

use crate::criteria::FilterCriteria;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default)]
    pub clean: CleanSection,
}

/// Defaults for the `clean` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanSection {
    /// Directory to clean when none is given on the command line.
    #[serde(default)]
    pub target_path: Option<PathBuf>,

    /// Default filter criteria; each field can be overridden by a CLI flag.
    #[serde(default)]
    pub filters: FilterCriteria,
}

impl CleanupConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.sweepdir.toml` in the current directory
    /// 3. Look for `~/.config/sweepdir/config.toml` in home directory
    /// 4. Fall back to default (empty) configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if a discovered file does not parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // If explicitly specified, load from that path
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try current directory
        let local_config = PathBuf::from(".sweepdir.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try home directory
        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sweepdir")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        // Fall back to defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}
