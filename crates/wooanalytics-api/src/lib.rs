//! WooAnalytics API - client for the analytics backend.
//!
//! This crate defines the [`JobService`] seam consumed by the registration and
//! polling flow, and its reqwest implementation [`HttpJobService`].
//!
//! # Endpoints
//!
//! ```text
//! POST /register              -> client id, token, optional task id
//! POST /login                 -> token, email
//! POST /logout                (bearer)
//! GET  /task-status/{taskId}  -> PENDING | STARTED | SUCCESS | FAILURE | ...
//! GET  /sync-status/{email}   -> COMPLETE | IN_PROGRESS | PENDING | FAILED
//! GET  /latest-orders, /top-customers, /total-*, /aov, /sales-comparison (bearer)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use wooanalytics_api::{HttpJobService, JobService};
//! use wooanalytics_core::{ApiConfig, TaskId};
//!
//! let service = HttpJobService::new(&ApiConfig::default())?;
//! let state = service.task_status(&TaskId::new("abc")?).await?;
//! println!("task is {state}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use client::HttpJobService;
pub use dashboard::{
    Badge, DailyTotal, LatestOrder, OrderStatus, SalesComparison, SalesSeries, StatusCards,
    TopCustomer,
};
pub use detail::ErrorDetail;
pub use error::{ApiError, Result};
pub use service::JobService;
pub use types::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SyncState,
    SyncStatusResponse, TaskState, TaskStatusResponse,
};
