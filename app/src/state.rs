//! Application state shared by all commands.

use anyhow::Context;
use std::sync::Arc;
use wooanalytics_api::HttpJobService;
use wooanalytics_core::AppConfig;
use wooanalytics_store::SqliteStore;

pub struct AppState {
    pub config: AppConfig,
    pub service: HttpJobService,
    pub store: Arc<SqliteStore>,
}

impl AppState {
    /// Open the session database and build the HTTP client.
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let db_path = config
            .session_db_path()
            .context("failed to resolve session database path")?;
        tracing::info!("Session database: {}", db_path.display());

        let store = SqliteStore::open(&db_path)
            .await
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let service = HttpJobService::new(&config.api).context("failed to create API client")?;

        Ok(Self {
            config,
            service,
            store: Arc::new(store),
        })
    }

    /// Close the session database if no command still holds it.
    pub async fn close(self) {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close().await,
            Err(_) => tracing::debug!("Session store still shared, leaving pool to drop"),
        }
    }
}
