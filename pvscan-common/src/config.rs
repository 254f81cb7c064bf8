//! Configuration loading and resolution
//!
//! Config file resolution follows this priority order:
//! 1. Explicit path supplied by the caller (highest priority)
//! 2. `PVSCAN_CONFIG` environment variable
//! 3. `<user config dir>/pvscan/pvscan.toml`, if present
//! 4. Compiled defaults (fallback)
//!
//! A config file that is named but missing degrades to defaults with a warning.
//! A config file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PVSCAN_CONFIG";

/// Acquisition start format written to the PVScan `date` attribute
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Time-of-day format written to the Sequence `time` attribute
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Top-level TOML configuration
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Metadata reader settings
    pub reader: ReaderConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Settings for locating and parsing the metadata XML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// File extension of metadata candidates (without the dot)
    pub metadata_extension: String,
    /// chrono format of the root `date` attribute
    pub date_format: String,
    /// chrono format of the cycle-1 Sequence `time` attribute
    pub time_format: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            metadata_extension: "xml".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "pvscan_meta=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Reject values the reader cannot work with
    pub fn validate(&self) -> Result<()> {
        let ext = self.reader.metadata_extension.trim();
        if ext.is_empty() {
            return Err(Error::Config(
                "reader.metadata_extension must not be empty".to_string(),
            ));
        }
        if ext.starts_with('.') {
            return Err(Error::Config(format!(
                "reader.metadata_extension must not include the leading dot: {:?}",
                ext
            )));
        }
        if self.reader.date_format.trim().is_empty() || self.reader.time_format.trim().is_empty() {
            return Err(Error::Config(
                "reader.date_format and reader.time_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pvscan").join("pvscan.toml"))
}

/// Resolves which config file (if any) to load
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    explicit_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Resolver without an explicit path (ENV → user config → defaults)
    pub fn new() -> Self {
        Self { explicit_path: None }
    }

    /// Resolver with an explicit path that overrides every other source
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit_path: Some(path.into()),
        }
    }

    /// Config file path chosen by priority order, if any source names one
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }

    /// Load the resolved configuration, falling back to defaults
    pub fn resolve(&self) -> Result<TomlConfig> {
        match self.config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                TomlConfig::load(&path)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using compiled defaults",
                    path.display()
                );
                Ok(TomlConfig::default())
            }
            None => {
                debug!("No config file configured, using compiled defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}
