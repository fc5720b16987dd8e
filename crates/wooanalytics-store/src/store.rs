//! The key-value store abstraction.

use crate::error::Result;
use async_trait::async_trait;

/// Durable string key-value storage.
///
/// Implementations must be thread-safe (Send + Sync) so a single store can be
/// shared between the registration flow, the pollers and session actions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set or has been removed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a single key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key.
    async fn clear(&self) -> Result<()>;
}
