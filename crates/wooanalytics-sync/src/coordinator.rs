//! Owner of the reducer and both polling loops.
//!
//! The coordinator stands in for the registration view: mounting it spawns
//! the reducer and resumes the email loop from the stored session, and
//! unmounting (or dropping) it cancels everything it started. Navigating to
//! the dashboard stops both loops as well.

use crate::error::RegistrationError;
use crate::form::RegistrationForm;
use crate::poll::{EmailPoller, PollHandle, PollPolicy, TaskPoller};
use crate::submitter::{RegistrationResult, RegistrationSubmitter};
use crate::view::{Effect, SyncEvent, SyncView};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use wooanalytics_api::JobService;
use wooanalytics_core::{PollingConfig, TaskId};
use wooanalytics_store::{stored_email, KeyValueStore};

const EVENT_BUFFER: usize = 32;

/// Loop B together with the email it polls.
struct EmailPoll {
    email: String,
    handle: PollHandle,
}

/// Registration view controller.
pub struct SyncCoordinator {
    submitter: RegistrationSubmitter,
    store: Arc<dyn KeyValueStore>,
    task_poller: TaskPoller,
    email_poller: EmailPoller,
    events: mpsc::Sender<SyncEvent>,
    view: watch::Receiver<SyncView>,
    shutdown: CancellationToken,
    polls: CancellationToken,
    reducer: Option<JoinHandle<()>>,
    task_poll: Option<PollHandle>,
    email_poll: Option<EmailPoll>,
}

impl SyncCoordinator {
    /// Spawn the reducer and resume the email loop if a session email is stored.
    pub async fn mount(
        service: Arc<dyn JobService>,
        store: Arc<dyn KeyValueStore>,
        config: &PollingConfig,
    ) -> Self {
        let (events, receiver) = mpsc::channel(EVENT_BUFFER);
        let (publisher, view) = watch::channel(SyncView::default());
        let shutdown = CancellationToken::new();
        let polls = shutdown.child_token();

        let reducer = tokio::spawn(run_reducer(
            receiver,
            publisher,
            config.success_delay(),
            shutdown.clone(),
            polls.clone(),
        ));

        let mut coordinator = Self {
            submitter: RegistrationSubmitter::new(Arc::clone(&service), Arc::clone(&store)),
            store,
            task_poller: TaskPoller::new(Arc::clone(&service), PollPolicy::task(config)),
            email_poller: EmailPoller::new(service, PollPolicy::email(config)),
            events,
            view,
            shutdown,
            polls,
            reducer: Some(reducer),
            task_poll: None,
            email_poll: None,
        };

        match stored_email(coordinator.store.as_ref()).await {
            Ok(Some(email)) => {
                info!("Resuming sync tracking for {}", email);
                coordinator.start_email_poll(email);
            }
            Ok(None) => debug!("No stored session, nothing to resume"),
            Err(e) => error!("Failed to read stored email: {}", e),
        }

        coordinator
    }

    /// Submit the form; on success enter syncing mode and start both loops.
    ///
    /// The task loop only starts when the backend returned a task id. Loop B
    /// is restarted for the registered email with a fresh attempt budget,
    /// replacing any loop resumed for an earlier session.
    pub async fn register(
        &mut self,
        form: &RegistrationForm,
    ) -> Result<RegistrationResult, RegistrationError> {
        let result = self.submitter.submit(form).await?;

        if self.events.send(SyncEvent::Submitted).await.is_err() {
            warn!("Reducer stopped, registration will not be tracked");
        }
        if let Some(task_id) = result.task_id.clone() {
            self.start_task_poll(task_id);
        }
        if let Some(previous) = self.email_poll.take() {
            debug!("Replacing email poll for {}", previous.email);
            previous.handle.cancel();
            previous.handle.join().await;
        }
        self.start_email_poll(result.email.clone());

        Ok(result)
    }

    /// Start Loop A. Returns `false` if it is already running.
    pub fn start_task_poll(&mut self, task_id: TaskId) -> bool {
        let cancel = self.polls.child_token();
        match self.task_poller.start(task_id, self.events.clone(), cancel) {
            Some(handle) => {
                self.task_poll = Some(handle);
                true
            }
            None => false,
        }
    }

    /// Start Loop B. Returns `false` if it is already running for `email`.
    ///
    /// A loop still running for a different email is cancelled and replaced.
    pub fn start_email_poll(&mut self, email: String) -> bool {
        if let Some(current) = self.email_poll.as_ref() {
            if !current.handle.is_finished() {
                if current.email == email {
                    debug!("Email poll already running, ignoring start for {}", email);
                    return false;
                }
                info!("Switching email poll from {} to {}", current.email, email);
                current.handle.cancel();
            }
        }
        let cancel = self.polls.child_token();
        let handle = self
            .email_poller
            .start(email.clone(), self.events.clone(), cancel);
        self.email_poll = Some(EmailPoll { email, handle });
        true
    }

    /// Email Loop B was last started for, if any.
    #[must_use]
    pub fn polled_email(&self) -> Option<&str> {
        self.email_poll.as_ref().map(|poll| poll.email.as_str())
    }

    /// Whether Loop A is running.
    #[must_use]
    pub fn is_task_polling(&self) -> bool {
        self.task_poller.is_active()
    }

    /// Whether either loop is still running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.task_poller.is_active()
            || self
                .email_poll
                .as_ref()
                .is_some_and(|poll| !poll.handle.is_finished())
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> SyncView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view.clone()
    }

    /// Cancel both loops and the reducer, and wait for them to exit.
    pub async fn unmount(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.task_poll.take() {
            handle.cancel();
            handle.join().await;
        }
        if let Some(poll) = self.email_poll.take() {
            poll.handle.cancel();
            poll.handle.join().await;
        }
        if let Some(reducer) = self.reducer.take() {
            if let Err(e) = reducer.await {
                warn!("Reducer did not complete: {}", e);
            }
        }
        debug!("Sync coordinator unmounted");
    }
}

impl Drop for SyncCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_reducer(
    mut events: mpsc::Receiver<SyncEvent>,
    view: watch::Sender<SyncView>,
    success_delay: Duration,
    shutdown: CancellationToken,
    polls: CancellationToken,
) {
    let mut navigation: Option<Pin<Box<Sleep>>> = None;

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                let mut effect = None;
                view.send_modify(|state| effect = state.apply(event));
                debug!("Applied {:?}, phase now {:?}", event, view.borrow().phase);

                if effect == Some(Effect::ScheduleNavigation) {
                    navigation = Some(Box::pin(tokio::time::sleep(success_delay)));
                }
            }
            () = pending_navigation(&mut navigation) => {
                navigation = None;
                let mut navigated = false;
                view.send_if_modified(|state| {
                    navigated = state.complete_navigation();
                    navigated
                });
                if navigated {
                    info!("Sync complete, navigating to dashboard");
                    polls.cancel();
                } else {
                    debug!("Navigation skipped, sync no longer succeeded");
                }
            }
        }
    }
}

async fn pending_navigation(navigation: &mut Option<Pin<Box<Sleep>>>) {
    match navigation {
        Some(sleep) => sleep.await,
        None => std::future::pending().await,
    }
}
