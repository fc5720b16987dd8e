//! Configuration management for WooAnalytics.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/wooanalytics/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote API settings
    pub api: ApiConfig,
    /// Registration sync polling settings
    pub polling: PollingConfig,
    /// Session storage settings
    pub storage: StorageConfig,
    /// Log filter settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `WOOANALYTICS_API_URL`: Override the API base URL
    /// - `WOOANALYTICS_TASK_MAX_ATTEMPTS`: Override the task poll attempt ceiling
    /// - `WOOANALYTICS_POLL_INTERVAL_SECS`: Override both poll intervals
    /// - `WOOANALYTICS_LOG`: Override the log filter
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WOOANALYTICS_API_URL") {
            tracing::debug!("Override api.base_url from env: {}", url);
            self.api.base_url = url;
        }

        if let Some(val) = lookup("WOOANALYTICS_TASK_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                self.polling.task_max_attempts = attempts;
                tracing::debug!("Override polling.task_max_attempts from env: {}", attempts);
            }
        }

        if let Some(val) = lookup("WOOANALYTICS_POLL_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.polling.task_interval_secs = secs;
                self.polling.email_interval_secs = secs;
                tracing::debug!("Override poll intervals from env: {}s", secs);
            }
        }

        if let Some(filter) = lookup("WOOANALYTICS_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Check values that would make the client misbehave at runtime.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &str, reason: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.api.base_url.trim().is_empty() {
            return Err(invalid("api.base_url", "must not be empty"));
        }
        if self.polling.task_interval_secs == 0 {
            return Err(invalid("polling.task_interval_secs", "must be greater than zero"));
        }
        if self.polling.email_interval_secs == 0 {
            return Err(invalid("polling.email_interval_secs", "must be greater than zero"));
        }
        if self.polling.task_max_attempts == 0 {
            return Err(invalid("polling.task_max_attempts", "must be greater than zero"));
        }
        if self.polling.email_max_attempts == 0 {
            return Err(invalid("polling.email_max_attempts", "must be greater than zero"));
        }
        if self.polling.transport_retry_limit == 0 {
            return Err(invalid("polling.transport_retry_limit", "must be greater than zero"));
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/wooanalytics/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/wooanalytics`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Resolve the session database path.
    ///
    /// Relative `storage.database_file` values are placed under [`Self::data_dir`].
    pub fn session_db_path(&self) -> ConfigResult<PathBuf> {
        let file = Path::new(&self.storage.database_file);
        if file.is_absolute() {
            Ok(file.to_path_buf())
        } else {
            Ok(Self::data_dir()?.join(file))
        }
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("com", "wooanalytics", "wooanalytics").ok_or(ConfigError::NoConfigDir)
    }
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the analytics backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            user_agent: concat!("wooanalytics/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Registration sync polling settings.
///
/// Both the task-id loop and the email loop are bounded by an attempt
/// ceiling and share the same transport retry budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between task-status polls
    pub task_interval_secs: u64,
    /// Maximum task-status polls before reporting a timeout
    pub task_max_attempts: u32,
    /// Seconds between sync-status polls
    pub email_interval_secs: u64,
    /// Maximum sync-status polls before reporting a timeout
    pub email_max_attempts: u32,
    /// Consecutive transport failures tolerated before a loop gives up
    pub transport_retry_limit: u32,
    /// Delay between the success message and navigation, in milliseconds
    pub success_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            task_interval_secs: 5,
            task_max_attempts: 60, // 5 minutes at 5s
            email_interval_secs: 5,
            email_max_attempts: 60,
            transport_retry_limit: 3,
            success_delay_ms: 1200,
        }
    }
}

impl PollingConfig {
    /// Interval of the task-id loop.
    #[must_use]
    pub fn task_interval(&self) -> Duration {
        Duration::from_secs(self.task_interval_secs)
    }

    /// Interval of the email loop.
    #[must_use]
    pub fn email_interval(&self) -> Duration {
        Duration::from_secs(self.email_interval_secs)
    }

    /// Delay before navigating after a successful sync.
    #[must_use]
    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }
}

/// Session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file holding the session keys, relative to the data directory
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "session.db".to_string(),
        }
    }
}

/// Log filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,wooanalytics=debug".to_string(),
        }
    }
}
