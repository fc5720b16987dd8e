mod common;

use common::{registered, ScriptedService};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wooanalytics_api::TaskState;
use wooanalytics_core::TaskId;
use wooanalytics_store::MemoryStore;
use wooanalytics_sync::{
    PollOutcome, PollPolicy, PollSource, RegistrationForm, Route, SyncCoordinator, SyncEvent,
    SyncPhase, TaskPoller,
};

fn form() -> RegistrationForm {
    RegistrationForm::new("owner@shop.com", "pw", "pw")
}

async fn registered_coordinator(service: &Arc<ScriptedService>) -> SyncCoordinator {
    service.reply_register(Ok(registered(json!(1), Some("task-1"))));
    let store = Arc::new(MemoryStore::new());
    let mut coordinator =
        SyncCoordinator::mount(service.clone(), store, &common::polling()).await;
    coordinator.register(&form()).await.expect("registration");
    coordinator
}

#[tokio::test(start_paused = true)]
async fn test_success_navigates_after_delay_and_stops() {
    let service = ScriptedService::new();
    let k = 7;
    service.script_tasks((1..k).map(|_| Ok(TaskState::Started)));
    service.script_tasks([Ok(TaskState::Success)]);

    let coordinator = registered_coordinator(&service).await;
    let mut view = coordinator.subscribe();

    view.wait_for(|v| v.phase == SyncPhase::Succeeded)
        .await
        .expect("success");
    let succeeded_at = Instant::now();
    assert!(coordinator.view().syncing);

    view.wait_for(|v| v.route.is_some()).await.expect("navigation");
    assert!(succeeded_at.elapsed() >= Duration::from_millis(1200));

    let snapshot = coordinator.view();
    assert_eq!(snapshot.route, Some(Route::Dashboard));
    assert!(!snapshot.syncing);
    assert_eq!(snapshot.message.as_deref(), Some("Store synced successfully!"));
    assert_eq!(ScriptedService::calls(&service.task_calls), k);

    let email_calls = ScriptedService::calls(&service.sync_calls);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(ScriptedService::calls(&service.task_calls), k);
    assert_eq!(ScriptedService::calls(&service.sync_calls), email_calls);
    assert!(!coordinator.is_task_polling());

    coordinator.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_times_out_after_sixty_attempts() {
    let service = ScriptedService::new();
    let coordinator = registered_coordinator(&service).await;
    let mut view = coordinator.subscribe();

    view.wait_for(|v| v.phase == SyncPhase::TimedOut)
        .await
        .expect("timeout");

    let snapshot = coordinator.view();
    assert!(!snapshot.syncing);
    assert_eq!(
        snapshot.alert.as_deref(),
        Some("Sync taking too long, check again later.")
    );
    assert_eq!(snapshot.route, None);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ScriptedService::calls(&service.task_calls), 60);
    assert!(!coordinator.is_task_polling());

    coordinator.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_failure_stops_syncing() {
    let service = ScriptedService::new();
    service.script_tasks([Ok(TaskState::Pending), Ok(TaskState::Failure)]);

    let coordinator = registered_coordinator(&service).await;
    let mut view = coordinator.subscribe();

    view.wait_for(|v| v.phase == SyncPhase::Failed)
        .await
        .expect("failure");
    let snapshot = coordinator.view();
    assert!(!snapshot.syncing);
    assert_eq!(
        snapshot.alert.as_deref(),
        Some("Sync failed, please try again later.")
    );

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ScriptedService::calls(&service.task_calls), 2);
    assert_eq!(coordinator.view().route, None);

    coordinator.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_leave_syncing_silently() {
    let service = ScriptedService::new();
    service.script_tasks([Err(503), Err(503), Err(502)]);

    let coordinator = registered_coordinator(&service).await;
    let mut view = coordinator.subscribe();

    view.wait_for(|v| v.phase == SyncPhase::Aborted)
        .await
        .expect("aborted");
    let snapshot = coordinator.view();
    assert!(!snapshot.syncing);
    assert_eq!(snapshot.alert, None);
    assert_eq!(ScriptedService::calls(&service.task_calls), 3);
    assert!(!coordinator.is_task_polling());

    coordinator.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_a_no_op() {
    let service = ScriptedService::new();
    let poller = TaskPoller::new(service.clone(), PollPolicy::default());
    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });

    let task_id = TaskId::new("task-1").expect("task id");
    let handle = poller
        .start(task_id.clone(), tx.clone(), CancellationToken::new())
        .expect("first start");
    assert!(poller.is_active());
    assert!(poller
        .start(task_id.clone(), tx.clone(), CancellationToken::new())
        .is_none());

    // Ticks land at 5 s, 10 s, 15 s: one loop means three requests.
    tokio::time::sleep(Duration::from_millis(17_500)).await;
    assert_eq!(ScriptedService::calls(&service.task_calls), 3);

    handle.cancel();
    assert_eq!(handle.join().await, PollOutcome::Cancelled);
    assert!(!poller.is_active());

    let restarted = poller
        .start(task_id, tx, CancellationToken::new())
        .expect("start after cancel");
    drop(restarted);
}

#[tokio::test(start_paused = true)]
async fn test_coordinator_start_twice_keeps_one_loop() {
    let service = ScriptedService::new();
    let mut coordinator = registered_coordinator(&service).await;

    assert!(coordinator.is_task_polling());
    assert!(!coordinator.start_task_poll(TaskId::new("task-1").expect("task id")));

    coordinator.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_policy_runs_to_timeout() {
    let service = ScriptedService::new();
    let poller = TaskPoller::new(
        service.clone(),
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts: 3,
            transport_retry_limit: 3,
        },
    );
    let (tx, mut rx) = mpsc::channel(64);

    let handle = poller
        .start(TaskId::new("task-1").expect("task id"), tx, CancellationToken::new())
        .expect("start");
    assert_eq!(handle.join().await, PollOutcome::TimedOut);
    assert_eq!(ScriptedService::calls(&service.task_calls), 3);

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event);
    }
    assert_eq!(last, Some(SyncEvent::TimedOut(PollSource::Task)));
}

#[tokio::test(start_paused = true)]
async fn test_response_after_cancel_emits_nothing() {
    let service = ScriptedService::new();
    service.script_tasks([Ok(TaskState::Success)]);
    let gate = service.hold_status_requests();
    let poller = TaskPoller::new(service.clone(), PollPolicy::default());
    let (tx, mut rx) = mpsc::channel(8);

    let handle = poller
        .start(TaskId::new("task-1").expect("task id"), tx, CancellationToken::new())
        .expect("start");
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(ScriptedService::calls(&service.task_calls), 1);

    // The request completes with SUCCESS only after the owner cancelled.
    handle.cancel();
    gate.notify_one();
    assert_eq!(handle.join().await, PollOutcome::Cancelled);

    assert!(rx.try_recv().is_err());
    assert!(!poller.is_active());
}
