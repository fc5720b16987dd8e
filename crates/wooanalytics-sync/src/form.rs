//! Registration form input.

use crate::error::RegistrationError;
use std::fmt;
use wooanalytics_api::RegisterRequest;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fields collected by the registration form.
///
/// Passwords and WooCommerce credentials are wiped from memory on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct RegistrationForm {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Must equal `password`
    pub confirm_password: String,
    /// Display name of the store owner
    pub client_name: String,
    /// WooCommerce store URL, may be empty
    pub store_url: String,
    /// WooCommerce REST consumer key, may be empty
    pub consumer_key: String,
    /// WooCommerce REST consumer secret, may be empty
    pub consumer_secret: String,
}

impl RegistrationForm {
    /// Form with credentials only; store fields left empty.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            client_name: String::new(),
            store_url: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
        }
    }

    /// Set the owner display name.
    #[must_use]
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Set the WooCommerce store URL and REST credentials.
    #[must_use]
    pub fn with_store(
        mut self,
        store_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        self.store_url = store_url.into();
        self.consumer_key = consumer_key.into();
        self.consumer_secret = consumer_secret.into();
        self
    }

    /// Local checks that must pass before anything is sent.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        Ok(())
    }

    /// Wire body; the confirmation never leaves the client.
    #[must_use]
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            client_name: self.client_name.clone(),
            store_url: self.store_url.clone(),
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
        }
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("client_name", &self.client_name)
            .field("store_url", &self.store_url)
            .finish_non_exhaustive()
    }
}
