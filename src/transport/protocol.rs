//! Wire schema for browser ↔ host messages.
//!
//! Requests are free-form JSON objects carrying an `action` field.
//! Responses carry either a `displays` list or an `error` string,
//! never both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One output device as reported to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    /// Stable connector name (e.g. "DP-1").
    pub name: String,
    /// Free-text make/model string, possibly empty.
    pub description: String,
    /// Whether the output is currently active.
    pub enabled: bool,
    /// Current mode width in pixels, 0 if unknown.
    pub width: u32,
    /// Current mode height in pixels, 0 if unknown.
    pub height: u32,
    /// Horizontal position in the virtual screen layout.
    pub x: i32,
    /// Vertical position in the virtual screen layout.
    pub y: i32,
    /// Output scale factor.
    pub scale: f64,
}

impl Display {
    /// A fresh record with everything unknown except identity.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: false,
            width: 0,
            height: 0,
            x: 0,
            y: 0,
            scale: 1.0,
        }
    }
}

/// Response sent back to the extension. Exactly one per request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Enabled outputs, in the order the enumeration tool reported them.
    Displays { displays: Vec<Display> },
    /// Human-readable failure for the caller to present to the user.
    Error { error: String },
}

impl Response {
    #[must_use]
    pub fn displays(displays: Vec<Display>) -> Self {
        Self::Displays { displays }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Extract the `action` field from a request payload.
///
/// Returns `None` when the field is missing or not a string; the
/// session loop answers those with an unknown-action error.
pub fn action(request: &Value) -> Option<&str> {
    request.get("action").and_then(Value::as_str)
}
