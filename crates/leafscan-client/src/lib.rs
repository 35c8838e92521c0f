//! Client for the potato leaf classification service.
//!
//! The service is an opaque HTTP endpoint exposing `POST /predict` for
//! multipart image uploads and `GET /ping` for liveness. This crate owns the
//! request/response contract and turns every failure into a typed
//! [`PredictionError`].

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

pub use client::{PredictionClient, Predictor};
pub use config::{BaseUrlProfile, ClientConfig};
pub use error::{ClientResult, ErrorKind, PredictionError};
