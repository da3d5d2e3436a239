use serde::{Deserialize, Serialize};

/// Error body the backend returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Extracts the backend message from a raw response body, if it has one.
    pub fn message_from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .map(|parsed| parsed.error)
            .filter(|message| !message.trim().is_empty())
    }
}
