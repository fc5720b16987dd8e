//! Shared fixtures: a scripted in-process backend.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use wooanalytics_api::{
    ApiError, ErrorDetail, JobService, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, Result, SyncState, TaskState,
};
use wooanalytics_core::{PollingConfig, TaskId};
use wooanalytics_store::{save_session, MemoryStore, Session};

/// Backend double answering from per-endpoint scripts and counting calls.
///
/// Task and sync states are consumed in order; once a script is exhausted the
/// task endpoint answers `PENDING` and the sync endpoint `UNKNOWN`. A scripted
/// `Err(status)` stands in for a transport failure. Sync states scripted for a
/// specific email take precedence over the shared sync script.
#[derive(Default)]
pub struct ScriptedService {
    register_reply: Mutex<Option<Result<RegisterResponse>>>,
    login_reply: Mutex<Option<Result<LoginResponse>>>,
    task_script: Mutex<VecDeque<std::result::Result<TaskState, u16>>>,
    sync_script: Mutex<VecDeque<std::result::Result<SyncState, u16>>>,
    email_scripts: Mutex<HashMap<String, VecDeque<std::result::Result<SyncState, u16>>>>,
    email_calls: Mutex<HashMap<String, u32>>,
    gate: Mutex<Option<Arc<Notify>>>,
    logout_fails: AtomicBool,
    logout_token: Mutex<Option<String>>,
    pub register_calls: AtomicU32,
    pub login_calls: AtomicU32,
    pub logout_calls: AtomicU32,
    pub task_calls: AtomicU32,
    pub sync_calls: AtomicU32,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_register(&self, reply: Result<RegisterResponse>) {
        *self.register_reply.lock().unwrap() = Some(reply);
    }

    pub fn reply_login(&self, reply: Result<LoginResponse>) {
        *self.login_reply.lock().unwrap() = Some(reply);
    }

    pub fn script_tasks(&self, states: impl IntoIterator<Item = std::result::Result<TaskState, u16>>) {
        self.task_script.lock().unwrap().extend(states);
    }

    pub fn script_syncs(&self, states: impl IntoIterator<Item = std::result::Result<SyncState, u16>>) {
        self.sync_script.lock().unwrap().extend(states);
    }

    pub fn script_syncs_for(
        &self,
        email: &str,
        states: impl IntoIterator<Item = std::result::Result<SyncState, u16>>,
    ) {
        self.email_scripts
            .lock()
            .unwrap()
            .entry(email.to_string())
            .or_default()
            .extend(states);
    }

    /// Sync-status requests made for `email`.
    pub fn sync_calls_for(&self, email: &str) -> u32 {
        self.email_calls
            .lock()
            .unwrap()
            .get(email)
            .copied()
            .unwrap_or(0)
    }

    /// Hold every later status request until the returned `Notify` fires.
    ///
    /// Calls are counted before they wait, so a counter shows when a request
    /// is in flight.
    pub fn hold_status_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn fail_logout(&self) {
        self.logout_fails.store(true, Ordering::SeqCst);
    }

    pub fn logout_token(&self) -> Option<String> {
        self.logout_token.lock().unwrap().clone()
    }

    pub fn calls(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobService for ScriptedService {
    async fn register(&self, _request: &RegisterRequest) -> Result<RegisterResponse> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(status_error(500, None)))
    }

    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(status_error(500, None)))
    }

    async fn logout(&self, token: Option<&str>) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        *self.logout_token.lock().unwrap() = token.map(ToString::to_string);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(status_error(503, None));
        }
        Ok(())
    }

    async fn task_status(&self, _task_id: &TaskId) -> Result<TaskState> {
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        match self.task_script.lock().unwrap().pop_front() {
            Some(Ok(state)) => Ok(state),
            Some(Err(status)) => Err(status_error(status, None)),
            None => Ok(TaskState::Pending),
        }
    }

    async fn sync_status(&self, email: &str) -> Result<SyncState> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .email_calls
            .lock()
            .unwrap()
            .entry(email.to_string())
            .or_default() += 1;
        self.pass_gate().await;

        let scripted = self
            .email_scripts
            .lock()
            .unwrap()
            .get_mut(email)
            .and_then(VecDeque::pop_front);
        let next = scripted.or_else(|| self.sync_script.lock().unwrap().pop_front());
        match next {
            Some(Ok(state)) => Ok(state),
            Some(Err(status)) => Err(status_error(status, None)),
            None => Ok(SyncState::Unknown),
        }
    }
}

pub fn status_error(status: u16, detail: Option<ErrorDetail>) -> ApiError {
    ApiError::Status { status, detail }
}

pub fn registered(client_id: Value, task_id: Option<&str>) -> RegisterResponse {
    registered_as("owner@shop.com", client_id, task_id)
}

pub fn registered_as(email: &str, client_id: Value, task_id: Option<&str>) -> RegisterResponse {
    RegisterResponse {
        client_id,
        access_token: Some("jwt-token".to_string()),
        email: Some(email.to_string()),
        task_id: task_id.map(ToString::to_string),
        message: Some("Client registered successfully".to_string()),
    }
}

pub fn polling() -> PollingConfig {
    PollingConfig::default()
}

/// Store holding the session left behind by an earlier run.
pub async fn store_with_session(email: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    save_session(store.as_ref(), &Session::new("jwt-token", email))
        .await
        .expect("seed session");
    store
}
