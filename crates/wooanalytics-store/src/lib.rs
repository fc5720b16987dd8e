//! WooAnalytics session storage.
//!
//! Durable client-side key-value storage behind the [`KeyValueStore`] trait,
//! so the registration and polling flow can be exercised without a real
//! storage backend.
//!
//! # Backends
//!
//! - [`SqliteStore`]: `SQLite` file (or `:memory:`) via `SQLx` with embedded migrations
//! - [`MemoryStore`]: process-local map, used in tests and ephemeral sessions
//!
//! # Example
//!
//! ```ignore
//! use wooanalytics_store::{save_session, load_session, Session, SqliteStore};
//!
//! let store = SqliteStore::open("session.db").await?;
//! save_session(&store, &Session::new("jwt", "owner@shop.com")).await?;
//! let session = load_session(&store).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod memory;
pub mod session;
pub mod sqlite;
pub mod store;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use session::{
    clear_session, load_session, save_session, stored_email, stored_token, Session, EMAIL_KEY,
    TOKEN_KEY,
};
pub use sqlite::SqliteStore;
pub use store::KeyValueStore;
