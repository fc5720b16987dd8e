//! The Remote Job Service seam.

use crate::error::Result;
use crate::types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SyncState, TaskState,
};
use async_trait::async_trait;
use wooanalytics_core::TaskId;

/// Backend operations used by the registration and polling flow.
///
/// Implementations should be thread-safe (Send + Sync): the two pollers call
/// the same service concurrently from separate tasks.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Register a new account and queue the onboarding sync.
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse>;

    /// Authenticate an existing account.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// Notify the backend of a logout. Best effort: callers clear local state regardless.
    async fn logout(&self, token: Option<&str>) -> Result<()>;

    /// Current state of the onboarding job.
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskState>;

    /// Current sync state of the account. An unknown account is `SyncState::Unknown`.
    async fn sync_status(&self, email: &str) -> Result<SyncState>;
}
