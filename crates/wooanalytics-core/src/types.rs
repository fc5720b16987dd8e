//! Identifier newtypes shared across the WooAnalytics crates.

use crate::error::WooError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a registered client account.
///
/// The backend reports it as either a JSON number or a string. A missing,
/// `null` or blank identifier is never a valid `ClientId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new `ClientId` from a string.
    ///
    /// # Errors
    /// Returns error if the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, WooError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(WooError::Validation(
                "invalid client ID: must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Extract a client identifier from a loosely typed JSON value.
    ///
    /// Returns `None` for `null`, blank strings and non-scalar values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s.clone()).ok(),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a backend sync job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new `TaskId` from a string.
    ///
    /// # Errors
    /// Returns error if the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, WooError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(WooError::Validation(
                "invalid task ID: must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
