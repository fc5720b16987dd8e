//! Request and response bodies of the backend endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use wooanalytics_core::{ClientId, TaskId};

/// Body of `POST /register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Display name of the store owner
    pub client_name: String,
    /// WooCommerce store URL, may be empty
    pub store_url: String,
    /// WooCommerce REST consumer key, may be empty
    pub consumer_key: String,
    /// WooCommerce REST consumer secret, may be empty
    pub consumer_secret: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("client_name", &self.client_name)
            .field("store_url", &self.store_url)
            .finish_non_exhaustive()
    }
}

/// Body returned by `POST /register`.
///
/// Every member is optional on the wire: a 2xx answer without a client id
/// still means the registration failed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    /// Client identifier, a number or a string
    #[serde(default)]
    pub client_id: Value,
    /// Bearer token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Registered email
    #[serde(default)]
    pub email: Option<String>,
    /// Identifier of the onboarding sync job, absent when it could not be queued
    #[serde(default)]
    pub task_id: Option<String>,
    /// Informational message
    #[serde(default)]
    pub message: Option<String>,
}

impl RegisterResponse {
    /// Client identifier, `None` if missing, `null` or blank.
    #[must_use]
    pub fn client_id(&self) -> Option<ClientId> {
        ClientId::from_value(&self.client_id)
    }

    /// Onboarding task identifier, `None` if missing or blank.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        self.task_id
            .as_deref()
            .and_then(|id| TaskId::new(id).ok())
    }
}

/// Body of `POST /login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body returned by `POST /login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub access_token: String,
    /// Account email
    pub email: String,
    /// Display name of the store owner
    #[serde(default)]
    pub client_name: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("email", &self.email)
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}

/// State of the onboarding job, keyed by task id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Queued, or unknown to the job backend
    Pending,
    /// Picked up by a worker
    Started,
    /// Failed once and scheduled for retry
    Retry,
    /// Running
    InProgress,
    /// Finished successfully
    Success,
    /// Finished with an error
    Failure,
    /// Cancelled before completion
    Revoked,
    /// Any state this client does not recognise
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// The job finished successfully.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// The job ended without success. A revoked job will never succeed.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure | Self::Revoked)
    }

    /// No further transitions are expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.is_success() || self.is_failure()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Retry => "RETRY",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Revoked => "REVOKED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Body returned by `GET /task-status/{taskId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    /// Echo of the queried task id
    #[serde(default)]
    pub task_id: Option<String>,
    /// Current state
    pub status: TaskState,
}

/// Store sync state of an account, keyed by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    /// Initial sync finished
    Complete,
    /// Sync running
    InProgress,
    /// Sync queued
    Pending,
    /// Sync gave up
    Failed,
    /// No record for this email, or a state this client does not recognise
    #[serde(other)]
    Unknown,
}

impl SyncState {
    /// No further transitions are expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Complete => "COMPLETE",
            Self::InProgress => "IN_PROGRESS",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Body returned by `GET /sync-status/{email}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncStatusResponse {
    /// Current state, `null` before the first sync was queued
    #[serde(default)]
    pub sync_status: Option<SyncState>,
    /// Convenience flag mirroring `sync_status == COMPLETE`
    #[serde(default)]
    pub sync_complete: Option<bool>,
    /// Time of the last finished sync, as sent by the server
    #[serde(default)]
    pub last_synced_at: Option<String>,
}

impl SyncStatusResponse {
    /// Current state, `Unknown` when the server sent none.
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.sync_status.unwrap_or(SyncState::Unknown)
    }

    /// Parsed `last_synced_at`, `None` when absent or not an ISO-8601 local time.
    #[must_use]
    pub fn last_synced_at(&self) -> Option<NaiveDateTime> {
        self.last_synced_at
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
    }
}
