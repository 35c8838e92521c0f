//! Disease labels and their presentation metadata.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Color used for labels the lookup table does not know.
pub const NEUTRAL_COLOR: &str = "#999999";

/// Class labels emitted by the classification service.
///
/// The service is expected to return one of the three known labels, but the
/// client must tolerate anything else, so parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiseaseClass {
    /// `Potato___Early_blight`
    EarlyBlight,
    /// `Potato___Late_blight`
    LateBlight,
    /// `Potato___healthy`
    Healthy,
    /// Any label outside the known set, kept verbatim
    Unknown(String),
}

impl DiseaseClass {
    /// All labels the lookup table has entries for.
    pub const KNOWN: &'static [DiseaseClass] = &[
        DiseaseClass::EarlyBlight,
        DiseaseClass::LateBlight,
        DiseaseClass::Healthy,
    ];

    /// Returns the raw label as sent over the wire.
    pub fn as_label(&self) -> &str {
        match self {
            DiseaseClass::EarlyBlight => "Potato___Early_blight",
            DiseaseClass::LateBlight => "Potato___Late_blight",
            DiseaseClass::Healthy => "Potato___healthy",
            DiseaseClass::Unknown(label) => label,
        }
    }

    /// Whether the label is one of the known classes.
    pub fn is_known(&self) -> bool {
        !matches!(self, DiseaseClass::Unknown(_))
    }

    /// Look up display metadata for this class.
    pub fn info(&self) -> DiseaseInfo {
        match self {
            DiseaseClass::EarlyBlight => DiseaseInfo {
                name: "Early Blight".to_string(),
                color: "#FF6B6B",
                description: "A fungal disease that causes dark spots on leaves.",
                recommendation: "Apply fungicide and remove infected leaves.",
            },
            DiseaseClass::LateBlight => DiseaseInfo {
                name: "Late Blight".to_string(),
                color: "#FF4444",
                description: "A serious disease that can destroy entire crops.",
                recommendation: "Apply copper-based fungicide immediately and improve drainage.",
            },
            DiseaseClass::Healthy => DiseaseInfo {
                name: "Healthy".to_string(),
                color: "#4CAF50",
                description: "The plant is healthy with no signs of disease.",
                recommendation: "Continue regular care and monitoring.",
            },
            DiseaseClass::Unknown(label) => DiseaseInfo {
                name: label.clone(),
                color: NEUTRAL_COLOR,
                description: "Unknown",
                recommendation: "Consult an expert",
            },
        }
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for DiseaseClass {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Potato___Early_blight" => DiseaseClass::EarlyBlight,
            "Potato___Late_blight" => DiseaseClass::LateBlight,
            "Potato___healthy" => DiseaseClass::Healthy,
            other => DiseaseClass::Unknown(other.to_string()),
        })
    }
}

impl From<String> for DiseaseClass {
    fn from(label: String) -> Self {
        match label.parse() {
            Ok(class) => class,
            Err(never) => match never {},
        }
    }
}

impl From<DiseaseClass> for String {
    fn from(class: DiseaseClass) -> Self {
        class.as_label().to_string()
    }
}

/// Human-readable metadata for a disease class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    /// Display name
    pub name: String,
    /// Hex color used for tags and borders
    pub color: &'static str,
    /// Short description of the condition
    pub description: &'static str,
    /// Recommended action for the grower
    pub recommendation: &'static str,
}
