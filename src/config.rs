// ABOUTME: Toast manager configuration loaded from TOML
// Holds sweep cadence and default time-to-live, with sane defaults when no file exists

use chrono::TimeDelta;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Sweep cadence used when the config does not set one.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 5_000;
/// TTL used when the config does not set one.
pub const DEFAULT_TTL_MS: i64 = 30_000;

/// Failures while reading, writing or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path:?}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this config.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `sweep_interval_ms` was zero.
    #[error("sweep_interval_ms must be greater than zero")]
    InvalidInterval,

    /// `default_ttl_ms` cannot be represented as a duration.
    #[error("default_ttl_ms {0} is out of range")]
    InvalidTtl(i64),
}

/// Settings for a `ToastManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// How often the background timer sweeps expired toasts.
    pub sweep_interval_ms: u64,
    /// TTL used by `ToastManager::post`.
    pub default_ttl_ms: i64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            default_ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

impl ManagerConfig {
    /// Replace the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = interval.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Replace the default TTL.
    pub fn with_default_ttl(mut self, ttl: TimeDelta) -> Self {
        self.default_ttl_ms = ttl.num_milliseconds();
        self
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Default TTL as a `TimeDelta`. An unrepresentable value saturates to `TimeDelta::MIN`.
    pub fn default_ttl(&self) -> TimeDelta {
        TimeDelta::try_milliseconds(self.default_ttl_ms).unwrap_or(TimeDelta::MIN)
    }

    /// Reject a zero sweep interval or an unrepresentable TTL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if TimeDelta::try_milliseconds(self.default_ttl_ms).is_none() {
            return Err(ConfigError::InvalidTtl(self.default_ttl_ms));
        }
        Ok(())
    }

    /// `<config dir>/toast-box/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "toast-box").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ManagerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
        assert_eq!(config.default_ttl(), TimeDelta::seconds(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ManagerConfig::from_toml("sweep_interval_ms = 1000").unwrap();
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
        assert_eq!(config.default_ttl_ms, DEFAULT_TTL_MS);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ManagerConfig::from_toml("sweep_interval_ms = 0");
        assert!(matches!(result, Err(ConfigError::InvalidInterval)));
    }

    #[test]
    fn test_unrepresentable_ttl_rejected() {
        let result = ManagerConfig::from_toml("default_ttl_ms = -9223372036854775808");
        assert!(matches!(result, Err(ConfigError::InvalidTtl(i64::MIN))));

        let config = ManagerConfig {
            default_ttl_ms: i64::MIN,
            ..ManagerConfig::default()
        };
        assert_eq!(config.default_ttl(), TimeDelta::MIN);
    }

    #[test]
    fn test_huge_ttl_accepted() {
        let config = ManagerConfig::from_toml("default_ttl_ms = 9000000000000000000").unwrap();
        assert_eq!(config.default_ttl(), TimeDelta::milliseconds(9_000_000_000_000_000_000));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = ManagerConfig::from_toml("sweep_interval_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
