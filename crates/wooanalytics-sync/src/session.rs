//! Login and logout.

use crate::error::{SessionError, LOGIN_FAILED};
use std::sync::Arc;
use tracing::{error, info, warn};
use wooanalytics_api::{ErrorDetail, JobService, LoginRequest};
use wooanalytics_store::{clear_session, save_session, stored_token, KeyValueStore, Session};

/// Session lifecycle against the backend and the local store.
#[derive(Clone)]
pub struct SessionActions {
    service: Arc<dyn JobService>,
    store: Arc<dyn KeyValueStore>,
}

impl SessionActions {
    /// Create the actions.
    pub fn new(service: Arc<dyn JobService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { service, store }
    }

    /// Authenticate and persist the session.
    ///
    /// A rejected login leaves any stored session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.service.login(&request).await.map_err(|e| {
            warn!("Login of {} failed: {}", email, e);
            let message = match e.detail() {
                Some(ErrorDetail::Message(message)) => message.clone(),
                _ => LOGIN_FAILED.to_string(),
            };
            SessionError::Rejected(message)
        })?;

        let session = Session::new(response.access_token.as_str(), response.email.as_str());
        save_session(self.store.as_ref(), &session).await?;
        info!("Logged in as {}", session.email());
        Ok(session)
    }

    /// Notify the backend, then clear every stored key.
    ///
    /// Storage is cleared even when the remote call fails. Returns whether the
    /// backend acknowledged the logout.
    pub async fn logout(&self) -> Result<bool, SessionError> {
        let token = match stored_token(self.store.as_ref()).await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read stored token: {}", e);
                None
            }
        };

        let acknowledged = match self
            .service
            .logout(token.as_deref().map(String::as_str))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Remote logout failed, clearing local session anyway: {}", e);
                false
            }
        };

        clear_session(self.store.as_ref()).await?;
        Ok(acknowledged)
    }
}
