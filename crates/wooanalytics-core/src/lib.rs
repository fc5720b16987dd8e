//! WooAnalytics Core - Foundation crate for the WooAnalytics client.
//!
//! This crate provides the shared error types, configuration management and
//! identifier newtypes that the store, API and sync crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Identifier newtypes (`ClientId`, `TaskId`)
//!
//! # Example
//!
//! ```rust
//! use wooanalytics_core::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.polling.task_max_attempts, 60);
//! assert!(config.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, AppConfig, LoggingConfig, PollingConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult, WooError};
pub use types::{ClientId, TaskId};
