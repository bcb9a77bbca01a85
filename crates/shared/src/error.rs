use serde::{Deserialize, Serialize};

/// Error body convention shared by every endpoint: non-2xx responses
/// SHOULD carry `{"error": "..."}`. Clients fall back to a
/// status-derived message when the body is absent or unparsable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Fallback message for a non-2xx response without a readable body.
pub fn status_fallback_message(status: u16) -> String {
    format!("Request failed: {status}")
}
