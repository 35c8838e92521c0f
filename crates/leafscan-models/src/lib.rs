//! Shared data models for the LeafScan client.
//!
//! This crate provides Serde-serializable types for:
//! - Image uploads and content-type inference
//! - Prediction results returned by the classification service
//! - The disease label lookup table used for presentation

pub mod disease;
pub mod image;
pub mod prediction;

// Re-export common types
pub use disease::{DiseaseClass, DiseaseInfo, NEUTRAL_COLOR};
pub use image::{
    filename_from_uri, infer_content_type, is_image_mime, known_image_type, resolve_content_type,
    ImageUpload, DEFAULT_CONTENT_TYPE,
};
pub use prediction::{format_confidence, PredictionResult, PredictionValidationError};
