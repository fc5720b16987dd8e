//! Loop A: job state by task id.

use super::{drive, PollHandle, PollOutcome, PollPolicy, Step};
use crate::view::{PollSource, SyncEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wooanalytics_api::{JobService, TaskState};
use wooanalytics_core::TaskId;

/// Single-flight poller of `GET /task-status/{taskId}`.
///
/// The first request is sent one interval after start.
pub struct TaskPoller {
    service: Arc<dyn JobService>,
    policy: PollPolicy,
    active: Arc<AtomicBool>,
}

/// Clears the single-flight flag however the loop ends.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TaskPoller {
    /// Create an idle poller.
    pub fn new(service: Arc<dyn JobService>, policy: PollPolicy) -> Self {
        Self {
            service,
            policy: policy.normalized(),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a loop is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start polling `task_id` until `cancel` fires or the loop ends.
    ///
    /// Returns `None` without side effects if a loop is already running.
    pub fn start(
        &self,
        task_id: TaskId,
        events: mpsc::Sender<SyncEvent>,
        cancel: CancellationToken,
    ) -> Option<PollHandle> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Task poll already running, ignoring start for {}", task_id);
            return None;
        }
        info!("Starting task poll for {}", task_id);

        let guard = ActiveGuard(Arc::clone(&self.active));
        let service = Arc::clone(&self.service);
        let policy = self.policy;
        let token = cancel.clone();

        Some(PollHandle::spawn(cancel, async move {
            let _guard = guard;
            drive(
                PollSource::Task,
                policy,
                policy.interval,
                token,
                events,
                move || {
                    let service = Arc::clone(&service);
                    let task_id = task_id.clone();
                    async move { service.task_status(&task_id).await }
                },
                classify,
            )
            .await
        }))
    }
}

fn classify(state: TaskState) -> Step {
    if state.is_success() {
        Step::Finish(
            SyncEvent::Succeeded(PollSource::Task),
            PollOutcome::Succeeded,
        )
    } else if state.is_failure() {
        Step::Finish(SyncEvent::Failed(PollSource::Task), PollOutcome::Failed)
    } else {
        Step::Continue(Some(SyncEvent::Progress(PollSource::Task)))
    }
}
