//! Prediction results returned by the classification service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::disease::DiseaseClass;

/// Classification output for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw class label, e.g. `Potato___Early_blight`
    pub class: String,
    /// Probability of the top class, in `0.0..=1.0`
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(class: impl Into<String>, confidence: f64) -> Self {
        Self {
            class: class.into(),
            confidence,
        }
    }

    /// Check the confidence is a probability.
    pub fn validate(&self) -> Result<(), PredictionValidationError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(PredictionValidationError::ConfidenceOutOfRange(
                self.confidence,
            ));
        }
        Ok(())
    }

    /// Parsed class label.
    pub fn disease(&self) -> DiseaseClass {
        DiseaseClass::from(self.class.clone())
    }

    /// Confidence as a percentage string.
    pub fn confidence_percent(&self) -> String {
        format_confidence(self.confidence)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictionValidationError {
    #[error("Confidence {0} is outside 0.0..=1.0")]
    ConfidenceOutOfRange(f64),
}

/// Render a probability as a percentage with two decimals, e.g. `95.67%`.
///
/// Halves round away from zero, so `0.00125` renders as `0.13%`.
pub fn format_confidence(confidence: f64) -> String {
    let hundredths = (confidence * 10_000.0).round() / 100.0;
    format!("{:.2}%", hundredths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.9567), "95.67%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(0.5), "50.00%");
    }

    #[test]
    fn test_format_confidence_rounds_half_up() {
        assert_eq!(format_confidence(0.00125), "0.13%");
        assert_eq!(format_confidence(0.12345), "12.35%");
    }

    #[test]
    fn test_deserialize_wire_format() {
        let result: PredictionResult =
            serde_json::from_str(r#"{"class": "Potato___healthy", "confidence": 0.98}"#).unwrap();
        assert_eq!(result.class, "Potato___healthy");
        assert_eq!(result.disease(), DiseaseClass::Healthy);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_missing_confidence_is_an_error() {
        let parsed = serde_json::from_str::<PredictionResult>(r#"{"class": "Potato___healthy"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(PredictionResult::new("x", 0.0).validate().is_ok());
        assert!(PredictionResult::new("x", 1.0).validate().is_ok());
        assert_eq!(
            PredictionResult::new("x", 1.5).validate(),
            Err(PredictionValidationError::ConfidenceOutOfRange(1.5))
        );
        assert!(PredictionResult::new("x", -0.1).validate().is_err());
        assert!(PredictionResult::new("x", f64::NAN).validate().is_err());
    }
}
