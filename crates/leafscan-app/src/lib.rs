//! Screen flow, presentation and CLI for the LeafScan client.
//!
//! This crate provides:
//! - Image acquisition for web-style file drops and mobile-style capture
//! - A pure state machine for the select/predict/result screen
//! - Result and alert presentation
//! - Configuration and tracing setup for the `leafscan` binary

pub mod acquisition;
pub mod config;
pub mod error;
pub mod presenter;
pub mod session;
pub mod state;
pub mod telemetry;

pub use acquisition::{
    accept_file, accept_file_from_path, Acquisition, FileCandidate, SelectedImage,
};
pub use config::{AppConfig, LogFormat};
pub use error::{AcquireError, AcquireResult};
pub use presenter::{Alert, ResultView};
pub use session::Session;
pub use state::{reduce, Action, Effect, Phase, ScreenState};
