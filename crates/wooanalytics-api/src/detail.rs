//! Extraction of the `detail` member of backend error bodies.
//!
//! The backend reports errors either as `{"detail": "message"}` or, for
//! request validation failures, as a list of structured field errors:
//!
//! ```json
//! {"detail": [{"loc": ["body", "email"], "msg": "field required", "type": "missing"}]}
//! ```

use serde_json::Value;

/// Error detail carried by a non-success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// A single message string.
    Message(String),
    /// Messages of structured field errors, in server order.
    Fields(Vec<String>),
}

impl ErrorDetail {
    /// Parse the `detail` member of an error body.
    ///
    /// Returns `None` when the body has no usable detail: missing, another
    /// JSON type, or a list in which no entry carries a string `msg`.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        match body.get("detail")? {
            Value::String(message) => Some(Self::Message(message.clone())),
            Value::Array(entries) => {
                let messages: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                    .map(ToString::to_string)
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(Self::Fields(messages))
                }
            }
            _ => None,
        }
    }

    /// Parse a raw response body, tolerating non-JSON payloads.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|body| Self::from_body(&body))
    }

    /// Display message: the string itself, or field messages joined with `", "`.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Message(message) => message.clone(),
            Self::Fields(messages) => messages.join(", "),
        }
    }
}
