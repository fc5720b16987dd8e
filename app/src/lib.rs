//! WooAnalytics command-line client.

mod cli;
mod commands;
mod state;

pub use cli::{Cli, Command};

use anyhow::Context;
use clap::Parser;
use state::AppState;
use tracing::info;
use wooanalytics_core::AppConfig;

/// Initialize tracing subscriber for logging
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Parse arguments, load configuration and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging.filter);

    info!("Starting WooAnalytics v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::open(config).await?;
    let result = commands::dispatch(&state, cli.command).await;
    state.close().await;
    result
}
