//! Result and alert presentation.

use serde::Serialize;

use leafscan_client::PredictionError;
use leafscan_models::PredictionResult;

use crate::error::AcquireError;

/// Everything a surface needs to render one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    /// Raw class label from the service
    pub label: String,
    /// Display name
    pub name: String,
    /// Hex color for the tag/border
    pub color: &'static str,
    /// Confidence formatted as a percentage, e.g. `95.67%`
    pub confidence: String,
    pub description: &'static str,
    pub recommendation: &'static str,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        let info = result.disease().info();
        Self {
            label: result.class.clone(),
            name: info.name,
            color: info.color,
            confidence: result.confidence_percent(),
            description: info.description,
            recommendation: info.recommendation,
        }
    }
}

/// Multi-line text rendering used by the CLI.
pub fn render_text(view: &ResultView) -> String {
    format!(
        "Diagnosis Result\n  Disease:        {} ({})\n  Confidence:     {}\n  Description:    {}\n  Recommendation: {}",
        view.name, view.label, view.confidence, view.description, view.recommendation
    )
}

/// A blocking, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn permission_required() -> Self {
        Self::new(
            "Permission Required",
            "Camera and photo library permissions are required to use this app.",
        )
    }

    pub fn no_image() -> Self {
        Self::new("No Image", "Please select or capture an image first")
    }

    /// A prediction abandoned before the service answered.
    pub fn cancelled() -> Self {
        Self::new("Cancelled", "The prediction was cancelled. Please try again.")
    }

    /// Alert for a failed acquisition.
    pub fn for_acquire(err: &AcquireError) -> Self {
        match err {
            AcquireError::PermissionDenied => Self::permission_required(),
            AcquireError::InvalidFileType { name, .. } => Self::new(
                "Unsupported File",
                format!("{} is not an image. Please choose an image file.", name),
            ),
            AcquireError::CaptureFailed(_) => Self::new("Error", "Failed to capture image"),
            AcquireError::Unreadable { .. } => Self::new("Error", "Failed to read the selected image"),
        }
    }

    /// Alert for a failed prediction, naming the likely cause.
    ///
    /// A server-supplied detail is shown as-is; anything else points at the
    /// service not running.
    pub fn for_prediction(err: &PredictionError, base_url: &str) -> Self {
        match err.detail() {
            Some(detail) => Self::new("Error", detail),
            None => Self::new(
                "Error",
                format!(
                    "{}. Make sure the API server is running at {}.",
                    err.user_message(),
                    base_url
                ),
            ),
        }
    }
}
