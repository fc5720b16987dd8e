//! WooAnalytics Sync - registration and background sync tracking.
//!
//! After a store owner registers, the backend queues a job that imports their
//! WooCommerce data. This crate submits the registration, then follows that
//! job with two independent polling loops and folds their results into one
//! observable [`SyncView`]:
//!
//! - Loop A ([`TaskPoller`]) asks for the job state by task id.
//! - Loop B ([`EmailPoller`]) asks for the account sync state by email, and
//!   is the only loop that can resume after a restart.
//!
//! Both loops share one [`PollPolicy`]: fixed interval, attempt ceiling and a
//! bounded budget of consecutive transport failures.
//!
//! # Example
//!
//! ```ignore
//! use wooanalytics_sync::{RegistrationForm, SyncCoordinator};
//!
//! let mut coordinator = SyncCoordinator::mount(service, store, &config.polling).await;
//! coordinator.register(&RegistrationForm::new("owner@shop.com", "pw", "pw")).await?;
//!
//! let mut view = coordinator.subscribe();
//! view.wait_for(|v| !v.syncing).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod coordinator;
pub mod error;
pub mod form;
pub mod poll;
pub mod session;
pub mod submitter;
pub mod view;

// Re-export commonly used types
pub use coordinator::SyncCoordinator;
pub use error::{ErrorKind, RegistrationError, SessionError};
pub use form::RegistrationForm;
pub use poll::{EmailPoller, PollHandle, PollOutcome, PollPolicy, TaskPoller, MIN_INTERVAL};
pub use session::SessionActions;
pub use submitter::{RegistrationResult, RegistrationSubmitter};
pub use view::{Effect, PollSource, Route, SyncEvent, SyncPhase, SyncView};
