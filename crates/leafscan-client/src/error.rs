//! Prediction client error types.

use std::time::Duration;

use thiserror::Error;

pub type ClientResult<T> = Result<T, PredictionError>;

/// Message shown when the server gives nothing better.
pub const GENERIC_FAILURE: &str = "Failed to predict disease";

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Service returned {status}: {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Http { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification used by front-ends to pick an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    Timeout,
    Http,
    MalformedResponse,
    Config,
}

impl PredictionError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Classify a transport error, using the timeout the request was sent with.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Network(_) => ErrorKind::NetworkFailure,
            PredictionError::Timeout(_) => ErrorKind::Timeout,
            PredictionError::Http { .. } => ErrorKind::Http,
            PredictionError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            PredictionError::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// Server-supplied detail, if the service sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            PredictionError::Http {
                detail: Some(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }

    /// Human-readable message: the server detail when present, otherwise
    /// the generic failure text.
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or(GENERIC_FAILURE).to_string()
    }

    /// Whether the likely cause is an unreachable or misbehaving service.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NetworkFailure | ErrorKind::Timeout | ErrorKind::MalformedResponse
        ) || matches!(self, PredictionError::Http { status, .. } if *status >= 500)
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = PredictionError::Http {
            status: 400,
            detail: Some("Invalid image file".to_string()),
        };
        assert_eq!(err.user_message(), "Invalid image file");
        assert_eq!(err.to_string(), "Service returned 400: Invalid image file");
    }

    #[test]
    fn test_user_message_generic_fallback() {
        let err = PredictionError::Http {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(PredictionError::network("refused").user_message(), GENERIC_FAILURE);
        assert_eq!(
            PredictionError::Timeout(Duration::from_secs(30)).user_message(),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            PredictionError::malformed("bad json").kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            PredictionError::Timeout(Duration::from_secs(5)).kind(),
            ErrorKind::Timeout
        );
    }

    #[test]
    fn test_service_unavailable() {
        assert!(PredictionError::network("refused").is_service_unavailable());
        assert!(PredictionError::malformed("x").is_service_unavailable());
        assert!(PredictionError::Http {
            status: 503,
            detail: None
        }
        .is_service_unavailable());
        assert!(!PredictionError::Http {
            status: 422,
            detail: None
        }
        .is_service_unavailable());
    }

    #[test]
    fn test_timeout_display() {
        let err = PredictionError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: PredictionError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
