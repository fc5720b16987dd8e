//! Fixed-interval polling loops.
//!
//! Each loop runs as one spawned task owned by a [`PollHandle`]. Dropping the
//! handle cancels the task; a response that arrives after cancellation is
//! discarded before any event is emitted.

mod email;
mod task;

pub use email::EmailPoller;
pub use task::TaskPoller;

use crate::view::{PollSource, SyncEvent};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wooanalytics_core::PollingConfig;

/// Shortest interval a loop will tick at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Schedule and limits of one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Time between two ticks
    pub interval: Duration,
    /// Ticks before the loop gives up with a timeout
    pub max_attempts: u32,
    /// Consecutive transport failures before the loop aborts
    pub transport_retry_limit: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
            transport_retry_limit: 3,
        }
    }
}

impl PollPolicy {
    /// Policy of the task-id loop.
    #[must_use]
    pub fn task(config: &PollingConfig) -> Self {
        Self {
            interval: config.task_interval(),
            max_attempts: config.task_max_attempts,
            transport_retry_limit: config.transport_retry_limit,
        }
        .normalized()
    }

    /// Policy of the email loop.
    #[must_use]
    pub fn email(config: &PollingConfig) -> Self {
        Self {
            interval: config.email_interval(),
            max_attempts: config.email_max_attempts,
            transport_retry_limit: config.transport_retry_limit,
        }
        .normalized()
    }

    /// Raise every limit to its smallest usable value.
    ///
    /// The interval is at least [`MIN_INTERVAL`]; a loop always makes at least
    /// one request and tolerates at least one transport failure.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            interval: self.interval.max(MIN_INTERVAL),
            max_attempts: self.max_attempts.max(1),
            transport_retry_limit: self.transport_retry_limit.max(1),
        }
    }
}

/// How a polling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Terminal success observed
    Succeeded,
    /// Terminal failure observed
    Failed,
    /// Attempt ceiling reached
    TimedOut,
    /// Transport retry budget exhausted
    Aborted,
    /// Cancelled by its owner, or the reducer went away
    Cancelled,
}

/// Owner of a running polling loop.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    fn spawn<F>(cancel: CancellationToken, future: F) -> Self
    where
        F: Future<Output = PollOutcome> + Send + 'static,
    {
        Self {
            cancel,
            task: Some(tokio::spawn(future)),
        }
    }

    /// Request the loop to stop. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the loop task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the loop to exit and return how it ended.
    pub async fn join(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Poll task did not complete: {}", e);
                PollOutcome::Cancelled
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Classification of one observed remote state.
pub(crate) enum Step {
    /// Keep polling, optionally reporting progress
    Continue(Option<SyncEvent>),
    /// Stop with a terminal event
    Finish(SyncEvent, PollOutcome),
}

/// Run one polling loop until a terminal state, a limit, or cancellation.
///
/// `first_tick` is the delay before the first request. Every request counts
/// as an attempt, including failed ones.
pub(crate) async fn drive<S, E, P, Fut, C>(
    source: PollSource,
    policy: PollPolicy,
    first_tick: Duration,
    cancel: CancellationToken,
    events: mpsc::Sender<SyncEvent>,
    mut request: P,
    classify: C,
) -> PollOutcome
where
    E: std::fmt::Display,
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
    C: Fn(S) -> Step,
{
    let policy = policy.normalized();
    let mut ticker = interval_at(Instant::now() + first_tick, policy.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let retry_limit = policy.transport_retry_limit;
    let mut attempts: u32 = 0;
    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        attempts += 1;
        debug!("{} poll attempt {}/{}", source, attempts, policy.max_attempts);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Cancelled,
            result = request() => result,
        };
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        match result {
            Ok(state) => {
                failures = 0;
                match classify(state) {
                    Step::Finish(event, outcome) => {
                        info!("{} poll finished after {} attempts: {:?}", source, attempts, outcome);
                        return emit(&events, &cancel, event).await.unwrap_or(outcome);
                    }
                    Step::Continue(Some(event)) => {
                        if let Some(cancelled) = emit(&events, &cancel, event).await {
                            return cancelled;
                        }
                    }
                    Step::Continue(None) => {}
                }
            }
            Err(e) => {
                failures += 1;
                warn!(
                    "{} poll request failed ({}/{} consecutive): {}",
                    source, failures, retry_limit, e
                );
                if failures >= retry_limit {
                    warn!("{} poll aborted after repeated transport errors", source);
                    let event = SyncEvent::Aborted(source);
                    return emit(&events, &cancel, event)
                        .await
                        .unwrap_or(PollOutcome::Aborted);
                }
            }
        }

        if attempts >= policy.max_attempts {
            info!("{} poll timed out after {} attempts", source, attempts);
            let event = SyncEvent::TimedOut(source);
            return emit(&events, &cancel, event)
                .await
                .unwrap_or(PollOutcome::TimedOut);
        }
    }
}

/// Deliver an event to the reducer. `Some(Cancelled)` means the loop must stop.
async fn emit(
    events: &mpsc::Sender<SyncEvent>,
    cancel: &CancellationToken,
    event: SyncEvent,
) -> Option<PollOutcome> {
    if cancel.is_cancelled() || events.send(event).await.is_err() {
        debug!("Dropping {:?}: poll no longer observed", event);
        return Some(PollOutcome::Cancelled);
    }
    None
}
