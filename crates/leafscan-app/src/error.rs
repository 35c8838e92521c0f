//! Image acquisition error types.

use thiserror::Error;

pub type AcquireResult<T> = Result<T, AcquireError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("Camera and photo library permissions are required")]
    PermissionDenied,

    #[error("Not an image: {name} ({})", .declared.as_deref().unwrap_or("unknown type"))]
    InvalidFileType {
        name: String,
        declared: Option<String>,
    },

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Could not read image {uri}: {reason}")]
    Unreadable { uri: String, reason: String },
}

impl AcquireError {
    pub fn capture_failed(msg: impl Into<String>) -> Self {
        Self::CaptureFailed(msg.into())
    }

    pub fn unreadable(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unreadable {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }
}
