//! `SQLite`-backed key-value store.
//!
//! Values live in the `kv_store` table created by the embedded migrations.
//! Writes are upserts so `set` replaces existing keys.

use crate::error::{Result, StoreError};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

const IN_MEMORY: &str = ":memory:";

/// Durable store backed by a `SQLx` `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and apply pending migrations.
    ///
    /// Parent directories are created as needed. Pass `":memory:"` for a
    /// store that lives as long as the returned value.
    ///
    /// # Errors
    /// Returns `StoreError` if the file cannot be opened or migrations fail.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| StoreError::Open("invalid store path: not valid UTF-8".to_string()))?;

        let in_memory = path_str == IN_MEMORY;
        if !in_memory {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let connect_options = SqliteConnectOptions::from_str(path_str)
            .map_err(|e| StoreError::Open(format!("invalid connection string: {e}")))?
            .create_if_missing(true);

        // Every connection to ":memory:" is a separate database, so pin the pool to one.
        let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Open(format!("failed to open session store: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;

        tracing::info!("Session store opened at {}", path_str);
        Ok(store)
    }

    /// Open a throwaway in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::open(IN_MEMORY).await
    }

    /// Apply the embedded migrations.
    async fn run_migrations(&self) -> Result<()> {
        tracing::debug!("Running session store migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(format!("migration execution failed: {e}")))?;
        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the connection pool gracefully.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Session store closed");
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar(
            r"
            SELECT value
            FROM kv_store
            WHERE key = ?
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await?;

        tracing::debug!("Cleared {} stored keys", result.rows_affected());
        Ok(())
    }
}
