mod common;

use common::{status_error, store_with_session, ScriptedService};
use std::sync::Arc;
use wooanalytics_api::{ErrorDetail, LoginResponse};
use wooanalytics_store::{load_session, KeyValueStore, MemoryStore};
use wooanalytics_sync::{ErrorKind, SessionActions};

#[tokio::test]
async fn test_logout_clears_storage_when_remote_fails() {
    let service = ScriptedService::new();
    service.fail_logout();
    let store = store_with_session("owner@shop.com").await;
    store.set("theme", "dark").await.expect("set");

    let actions = SessionActions::new(service.clone(), store.clone());
    let acknowledged = actions.logout().await.expect("logout");

    assert!(!acknowledged);
    assert_eq!(ScriptedService::calls(&service.logout_calls), 1);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_logout_sends_stored_token() {
    let service = ScriptedService::new();
    let store = store_with_session("owner@shop.com").await;

    let actions = SessionActions::new(service.clone(), store.clone());
    assert!(actions.logout().await.expect("logout"));

    assert_eq!(service.logout_token().as_deref(), Some("jwt-token"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_logout_without_session() {
    let service = ScriptedService::new();
    let store = Arc::new(MemoryStore::new());

    let actions = SessionActions::new(service.clone(), store.clone());
    assert!(actions.logout().await.expect("logout"));
    assert_eq!(service.logout_token(), None);
}

#[tokio::test]
async fn test_login_persists_session() {
    let service = ScriptedService::new();
    service.reply_login(Ok(LoginResponse {
        access_token: "fresh-token".to_string(),
        email: "owner@shop.com".to_string(),
        client_name: None,
    }));
    let store = Arc::new(MemoryStore::new());

    let actions = SessionActions::new(service, store.clone());
    let session = actions
        .login("owner@shop.com", "pw")
        .await
        .expect("login");
    assert_eq!(session.token(), "fresh-token");

    let stored = load_session(store.as_ref())
        .await
        .expect("load")
        .expect("session stored");
    assert_eq!(stored, session);
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let cases = [
        (
            Some(ErrorDetail::Message("Invalid credentials".to_string())),
            "Invalid credentials",
        ),
        (
            Some(ErrorDetail::Fields(vec!["field required".to_string()])),
            "Login failed",
        ),
        (None, "Login failed"),
    ];

    for (detail, expected) in cases {
        let service = ScriptedService::new();
        service.reply_login(Err(status_error(401, detail)));
        let store = store_with_session("previous@shop.com").await;

        let actions = SessionActions::new(service, store.clone());
        let err = actions.login("owner@shop.com", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), ErrorKind::Transport);
        let stored = load_session(store.as_ref())
            .await
            .expect("load")
            .expect("session kept");
        assert_eq!(stored.email(), "previous@shop.com");
    }
}
