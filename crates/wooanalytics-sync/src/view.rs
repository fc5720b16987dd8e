//! Sync view state and the reducer that drives it.
//!
//! Both polling loops report [`SyncEvent`]s; [`SyncView::apply`] folds them
//! into a single view. The last terminal event wins, and progress never
//! overrides a terminal phase.

use crate::error::ErrorKind;
use serde::Serialize;
use std::fmt;

/// Shown as soon as the registration is accepted.
pub const SETUP_MESSAGE: &str = "Setting up your store and fetching WooCommerce data...";

/// Shown while either loop sees a non-terminal state.
pub const PROGRESS_MESSAGE: &str = "Syncing your store data...";

/// Shown once a loop observes completion.
pub const SUCCESS_MESSAGE: &str = "Store synced successfully!";

/// Alert raised when the job reports failure.
pub const FAILURE_ALERT: &str = "Sync failed, please try again later.";

/// Alert raised when the attempt ceiling is reached.
pub const TIMEOUT_ALERT: &str = "Sync taking too long, check again later.";

/// Which loop produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollSource {
    /// Loop A, keyed by task id
    Task,
    /// Loop B, keyed by email
    Email,
}

impl fmt::Display for PollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => f.write_str("task"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Input of the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// Registration accepted, the sync job was queued
    Submitted,
    /// Job still running
    Progress(PollSource),
    /// Job finished successfully
    Succeeded(PollSource),
    /// Job reported failure
    Failed(PollSource),
    /// Attempt ceiling reached without a terminal state
    TimedOut(PollSource),
    /// Transport retry budget exhausted
    Aborted(PollSource),
}

impl SyncEvent {
    /// Error category of a failing event, `None` otherwise.
    #[must_use]
    pub fn error_kind(self) -> Option<ErrorKind> {
        match self {
            Self::Failed(_) => Some(ErrorKind::RemoteFailure),
            Self::TimedOut(_) => Some(ErrorKind::Timeout),
            Self::Aborted(_) => Some(ErrorKind::Transport),
            Self::Submitted | Self::Progress(_) | Self::Succeeded(_) => None,
        }
    }

    /// Whether the event ends a sync attempt.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Submitted | Self::Progress(_))
    }
}

/// Lifecycle phase of the sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Nothing submitted or observed yet
    #[default]
    Idle,
    /// Job queued or running
    Syncing,
    /// Job finished successfully
    Succeeded,
    /// Job failed
    Failed,
    /// Polling gave up after the attempt ceiling
    TimedOut,
    /// Polling gave up after repeated transport errors
    Aborted,
}

impl SyncPhase {
    /// Whether no further progress is expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::TimedOut | Self::Aborted
        )
    }
}

/// Navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Store dashboard
    Dashboard,
}

/// Side effect requested by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Navigate to the dashboard after the success delay, if still succeeded then.
    ScheduleNavigation,
}

/// Observable state of the registration view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncView {
    /// Lifecycle phase
    pub phase: SyncPhase,
    /// Whether the syncing overlay is shown
    pub syncing: bool,
    /// Status line under the spinner
    pub message: Option<String>,
    /// User-facing alert
    pub alert: Option<String>,
    /// Set once, when the view navigates away
    pub route: Option<Route>,
}

impl SyncView {
    /// Fold one event into the view.
    ///
    /// Events are ignored once the view navigated away. An email-loop timeout
    /// on a view that never entered syncing is dropped: the loop only ever
    /// saw `UNKNOWN`, which has nothing to report.
    pub fn apply(&mut self, event: SyncEvent) -> Option<Effect> {
        if self.route.is_some() {
            return None;
        }
        match event {
            SyncEvent::Submitted => {
                self.phase = SyncPhase::Syncing;
                self.syncing = true;
                self.message = Some(SETUP_MESSAGE.to_string());
                self.alert = None;
                None
            }
            SyncEvent::Progress(_) => {
                if !self.phase.is_terminal() {
                    self.phase = SyncPhase::Syncing;
                    self.syncing = true;
                    self.message = Some(PROGRESS_MESSAGE.to_string());
                }
                None
            }
            SyncEvent::Succeeded(_) => {
                if self.phase == SyncPhase::Succeeded {
                    return None;
                }
                self.phase = SyncPhase::Succeeded;
                self.message = Some(SUCCESS_MESSAGE.to_string());
                self.alert = None;
                Some(Effect::ScheduleNavigation)
            }
            SyncEvent::Failed(_) => {
                self.stop(SyncPhase::Failed);
                self.alert = Some(FAILURE_ALERT.to_string());
                None
            }
            SyncEvent::TimedOut(PollSource::Email) if self.phase == SyncPhase::Idle => None,
            SyncEvent::TimedOut(_) => {
                self.stop(SyncPhase::TimedOut);
                self.alert = Some(TIMEOUT_ALERT.to_string());
                None
            }
            SyncEvent::Aborted(_) => {
                self.stop(SyncPhase::Aborted);
                None
            }
        }
    }

    /// Perform the scheduled navigation.
    ///
    /// Returns `false` when a later terminal event replaced the success, or
    /// when the view already navigated.
    pub fn complete_navigation(&mut self) -> bool {
        if self.phase != SyncPhase::Succeeded || self.route.is_some() {
            return false;
        }
        self.syncing = false;
        self.route = Some(Route::Dashboard);
        true
    }

    fn stop(&mut self, phase: SyncPhase) {
        self.phase = phase;
        self.syncing = false;
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_enters_syncing() {
        let mut view = SyncView::default();
        assert_eq!(view.apply(SyncEvent::Submitted), None);
        assert!(view.syncing);
        assert_eq!(view.message.as_deref(), Some(SETUP_MESSAGE));

        view.apply(SyncEvent::Progress(PollSource::Task));
        assert_eq!(view.message.as_deref(), Some(PROGRESS_MESSAGE));
    }

    #[test]
    fn test_success_schedules_single_navigation() {
        let mut view = SyncView::default();
        view.apply(SyncEvent::Submitted);

        assert_eq!(
            view.apply(SyncEvent::Succeeded(PollSource::Task)),
            Some(Effect::ScheduleNavigation)
        );
        assert_eq!(view.apply(SyncEvent::Succeeded(PollSource::Email)), None);
        assert!(view.syncing);

        assert!(view.complete_navigation());
        assert!(!view.syncing);
        assert_eq!(view.route, Some(Route::Dashboard));
        assert!(!view.complete_navigation());

        view.apply(SyncEvent::TimedOut(PollSource::Email));
        assert_eq!(view.phase, SyncPhase::Succeeded);
        assert_eq!(view.alert, None);
    }

    #[test]
    fn test_last_terminal_wins() {
        let mut view = SyncView::default();
        view.apply(SyncEvent::Succeeded(PollSource::Email));
        view.apply(SyncEvent::Failed(PollSource::Task));

        assert_eq!(view.phase, SyncPhase::Failed);
        assert_eq!(view.alert.as_deref(), Some(FAILURE_ALERT));
        assert!(!view.complete_navigation());
        assert_eq!(view.route, None);
    }

    #[test]
    fn test_progress_does_not_override_terminal() {
        let mut view = SyncView::default();
        view.apply(SyncEvent::TimedOut(PollSource::Task));
        view.apply(SyncEvent::Progress(PollSource::Email));

        assert_eq!(view.phase, SyncPhase::TimedOut);
        assert!(!view.syncing);
        assert_eq!(view.alert.as_deref(), Some(TIMEOUT_ALERT));
    }

    #[test]
    fn test_email_timeout_from_idle_is_silent() {
        let mut view = SyncView::default();
        assert_eq!(view.apply(SyncEvent::TimedOut(PollSource::Email)), None);
        assert_eq!(view, SyncView::default());

        view.apply(SyncEvent::Progress(PollSource::Email));
        view.apply(SyncEvent::TimedOut(PollSource::Email));
        assert_eq!(view.phase, SyncPhase::TimedOut);
        assert_eq!(view.alert.as_deref(), Some(TIMEOUT_ALERT));
    }

    #[test]
    fn test_abort_is_silent() {
        let mut view = SyncView::default();
        view.apply(SyncEvent::Submitted);
        view.apply(SyncEvent::Aborted(PollSource::Task));

        assert_eq!(view.phase, SyncPhase::Aborted);
        assert!(!view.syncing);
        assert_eq!(view.alert, None);
    }

    #[test]
    fn test_event_error_kinds() {
        assert_eq!(
            SyncEvent::TimedOut(PollSource::Task).error_kind(),
            Some(ErrorKind::Timeout)
        );
        assert_eq!(
            SyncEvent::Failed(PollSource::Email).error_kind(),
            Some(ErrorKind::RemoteFailure)
        );
        assert_eq!(SyncEvent::Progress(PollSource::Email).error_kind(), None);
        assert!(!SyncEvent::Submitted.is_terminal());
    }
}
