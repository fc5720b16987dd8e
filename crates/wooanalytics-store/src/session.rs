//! Authenticated session persistence.
//!
//! A session is the pair of keys `token` and `email`. Both are written after a
//! successful registration or login and removed wholesale on logout.

use crate::error::Result;
use crate::store::KeyValueStore;
use std::fmt;
use zeroize::Zeroizing;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the account email.
pub const EMAIL_KEY: &str = "email";

/// Authenticated session.
///
/// The token is zeroized when the session is dropped and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Zeroizing<String>,
    email: String,
}

impl Session {
    /// Create a session from a bearer token and account email.
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            email: email.into(),
        }
    }

    /// Bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// Persist both session keys.
pub async fn save_session(store: &dyn KeyValueStore, session: &Session) -> Result<()> {
    store.set(TOKEN_KEY, session.token()).await?;
    store.set(EMAIL_KEY, session.email()).await?;
    tracing::debug!("Session persisted for {}", session.email());
    Ok(())
}

/// Load the persisted session, `None` unless both keys are present.
pub async fn load_session(store: &dyn KeyValueStore) -> Result<Option<Session>> {
    let token = store.get(TOKEN_KEY).await?;
    let email = store.get(EMAIL_KEY).await?;
    Ok(match (token, email) {
        (Some(token), Some(email)) => Some(Session::new(token, email)),
        _ => None,
    })
}

/// Persisted account email, if any. Blank values count as absent.
pub async fn stored_email(store: &dyn KeyValueStore) -> Result<Option<String>> {
    Ok(store
        .get(EMAIL_KEY)
        .await?
        .filter(|email| !email.trim().is_empty()))
}

/// Persisted bearer token, if any.
pub async fn stored_token(store: &dyn KeyValueStore) -> Result<Option<Zeroizing<String>>> {
    Ok(store.get(TOKEN_KEY).await?.map(Zeroizing::new))
}

/// Remove every stored key, not only the session pair.
pub async fn clear_session(store: &dyn KeyValueStore) -> Result<()> {
    store.clear().await?;
    tracing::info!("Stored session cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_save_and_load_session() {
        let store = MemoryStore::new();
        let session = Session::new("jwt-token", "owner@shop.com");

        save_session(&store, &session).await.expect("save session");

        let loaded = load_session(&store)
            .await
            .expect("load session")
            .expect("session present");
        assert_eq!(loaded, session);
        assert_eq!(
            stored_email(&store).await.expect("email"),
            Some("owner@shop.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_partial_session_is_absent() {
        let store = MemoryStore::new();
        store.set(EMAIL_KEY, "owner@shop.com").await.expect("set email");

        assert!(load_session(&store).await.expect("load").is_none());
        assert!(stored_token(&store).await.expect("token").is_none());
    }

    #[tokio::test]
    async fn test_blank_email_is_absent() {
        let store = MemoryStore::new();
        store.set(EMAIL_KEY, "  ").await.expect("set email");
        assert!(stored_email(&store).await.expect("email").is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_unrelated_keys() {
        let store = MemoryStore::new();
        save_session(&store, &Session::new("t", "e@x.io"))
            .await
            .expect("save");
        store.set("theme", "dark").await.expect("set theme");

        clear_session(&store).await.expect("clear");
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("super-secret", "e@x.io");
        let printed = format!("{session:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("e@x.io"));
    }
}
