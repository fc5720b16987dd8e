//! Registration submitter.

use crate::error::{RegistrationError, REGISTRATION_FAILED};
use crate::form::RegistrationForm;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use wooanalytics_api::JobService;
use wooanalytics_core::{ClientId, TaskId};
use wooanalytics_store::{save_session, KeyValueStore, Session};
use zeroize::Zeroizing;

/// Accepted registration.
#[derive(Clone)]
pub struct RegistrationResult {
    /// Identifier of the new client account
    pub client_id: ClientId,
    /// Bearer token of the new session
    pub access_token: Zeroizing<String>,
    /// Registered email
    pub email: String,
    /// Onboarding job, absent when it could not be queued
    pub task_id: Option<TaskId>,
}

impl fmt::Debug for RegistrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationResult")
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .field("email", &self.email)
            .field("task_id", &self.task_id)
            .finish()
    }
}

/// Sends the registration form and persists the resulting session.
#[derive(Clone)]
pub struct RegistrationSubmitter {
    service: Arc<dyn JobService>,
    store: Arc<dyn KeyValueStore>,
}

impl RegistrationSubmitter {
    /// Create a submitter.
    pub fn new(service: Arc<dyn JobService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { service, store }
    }

    /// Validate, register and persist `token`/`email`.
    ///
    /// Nothing is persisted unless the response carries a client id and a token.
    pub async fn submit(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationResult, RegistrationError> {
        form.validate()?;

        let response = self
            .service
            .register(&form.to_request())
            .await
            .map_err(|e| {
                warn!("Registration of {} failed: {}", form.email, e);
                RegistrationError::Transport(e.message_or(REGISTRATION_FAILED))
            })?;

        let Some(client_id) = response.client_id() else {
            warn!("Registration response for {} had no client id", form.email);
            return Err(RegistrationError::IncompleteResponse);
        };
        let Some(token) = response
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty())
        else {
            warn!("Registration response for {} had no token", form.email);
            return Err(RegistrationError::IncompleteResponse);
        };

        let email = response
            .email
            .clone()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or_else(|| form.email.clone());
        let session = Session::new(token, email.clone());
        save_session(self.store.as_ref(), &session).await?;

        let task_id = response.task_id();
        info!(
            "Registered client {} ({}), task: {}",
            client_id,
            email,
            task_id.as_ref().map_or("none", TaskId::as_str)
        );

        Ok(RegistrationResult {
            client_id,
            access_token: Zeroizing::new(token.to_string()),
            email,
            task_id,
        })
    }
}
