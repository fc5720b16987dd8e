//! Storage error types.

use thiserror::Error;

/// Session storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or create the backing database.
    #[error("failed to open store: {0}")]
    Open(String),

    /// Migration execution failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Underlying `SQLx` error.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// I/O error while preparing the store location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
