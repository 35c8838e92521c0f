//! Wire types for the classification service.

use serde::Deserialize;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Prediction endpoint path.
pub const PREDICT_PATH: &str = "/predict";

/// Liveness endpoint path.
pub const PING_PATH: &str = "/ping";

/// Error body returned with non-2xx statuses.
///
/// `detail` is a string for application errors, but validation errors carry
/// a structured value, so it is kept loose and only used when it is a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parse an error body, tolerating anything that is not JSON.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The detail message, if it is a non-empty string.
    pub fn detail_message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
