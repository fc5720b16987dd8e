//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Register a WooCommerce store and follow its data sync.
#[derive(Debug, Parser)]
#[command(name = "wooanalytics", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a store owner account and follow the initial sync
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        /// Display name of the store owner
        #[arg(long, default_value = "")]
        name: String,
        /// WooCommerce store URL
        #[arg(long, default_value = "")]
        store_url: String,
        /// WooCommerce REST consumer key
        #[arg(long, default_value = "")]
        consumer_key: String,
        /// WooCommerce REST consumer secret
        #[arg(long, default_value = "")]
        consumer_secret: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Follow the sync of the stored account until it settles
    Watch,
    /// Print the dashboard feeds as JSON
    Dashboard,
}
