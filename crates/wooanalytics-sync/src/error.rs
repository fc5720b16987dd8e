//! Error types for the registration and session flow.

use thiserror::Error;
use wooanalytics_store::StoreError;

/// Fallback message when a failed registration carries no usable detail.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Fallback message when a failed login carries no usable detail.
pub const LOGIN_FAILED: &str = "Login failed";

/// Category of a flow error, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally, never reached the network
    Validation,
    /// The server answered but omitted a required identifier
    IncompleteResponse,
    /// Network or HTTP failure
    Transport,
    /// Polling exceeded its attempt budget
    Timeout,
    /// The job reported an explicit failure
    RemoteFailure,
    /// Local session storage failed
    Storage,
}

/// Errors returned by [`crate::RegistrationSubmitter::submit`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// 2xx response without a client identifier or token
    #[error("Registration failed: no client data returned")]
    IncompleteResponse,

    /// The request failed; carries the message shown to the user
    #[error("{0}")]
    Transport(String),

    /// The session could not be persisted
    #[error("failed to persist session: {0}")]
    Storage(#[from] StoreError),
}

impl RegistrationError {
    /// Taxonomy category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PasswordMismatch => ErrorKind::Validation,
            Self::IncompleteResponse => ErrorKind::IncompleteResponse,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors returned by [`crate::SessionActions`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused the credentials or could not be reached
    #[error("{0}")]
    Rejected(String),

    /// Local session storage failed
    #[error("session storage error: {0}")]
    Storage(#[from] StoreError),
}

impl SessionError {
    /// Taxonomy category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(_) => ErrorKind::Transport,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_messages() {
        assert_eq!(
            RegistrationError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
        assert_eq!(
            RegistrationError::Transport("Email already registered".to_string()).to_string(),
            "Email already registered"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(RegistrationError::PasswordMismatch.kind(), ErrorKind::Validation);
        assert_eq!(
            RegistrationError::IncompleteResponse.kind(),
            ErrorKind::IncompleteResponse
        );
        assert_eq!(
            SessionError::Rejected(LOGIN_FAILED.to_string()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            SessionError::from(StoreError::Open("locked".to_string())).kind(),
            ErrorKind::Storage
        );
    }
}
