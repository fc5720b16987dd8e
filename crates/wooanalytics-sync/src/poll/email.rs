//! Loop B: account sync state by email.

use super::{drive, PollHandle, PollOutcome, PollPolicy, Step};
use crate::view::{PollSource, SyncEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wooanalytics_api::{JobService, SyncState};

/// Poller of `GET /sync-status/{email}`.
///
/// Ticks immediately, so a restarted client learns the state without waiting.
/// `UNKNOWN` leaves the view untouched.
pub struct EmailPoller {
    service: Arc<dyn JobService>,
    policy: PollPolicy,
}

impl EmailPoller {
    /// Create a poller.
    pub fn new(service: Arc<dyn JobService>, policy: PollPolicy) -> Self {
        Self {
            service,
            policy: policy.normalized(),
        }
    }

    /// Start polling the sync state of `email` until `cancel` fires or the loop ends.
    pub fn start(
        &self,
        email: String,
        events: mpsc::Sender<SyncEvent>,
        cancel: CancellationToken,
    ) -> PollHandle {
        info!("Starting email poll for {}", email);

        let service = Arc::clone(&self.service);
        let future = drive(
            PollSource::Email,
            self.policy,
            Duration::ZERO,
            cancel.clone(),
            events,
            move || {
                let service = Arc::clone(&service);
                let email = email.clone();
                async move { service.sync_status(&email).await }
            },
            classify,
        );

        PollHandle::spawn(cancel, future)
    }
}

fn classify(state: SyncState) -> Step {
    match state {
        SyncState::Complete => Step::Finish(
            SyncEvent::Succeeded(PollSource::Email),
            PollOutcome::Succeeded,
        ),
        SyncState::Failed => Step::Finish(SyncEvent::Failed(PollSource::Email), PollOutcome::Failed),
        SyncState::InProgress | SyncState::Pending => {
            Step::Continue(Some(SyncEvent::Progress(PollSource::Email)))
        }
        SyncState::Unknown => Step::Continue(None),
    }
}
