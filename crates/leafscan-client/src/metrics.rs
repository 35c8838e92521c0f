//! Client-side metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total prediction requests by outcome.
    pub const PREDICTIONS_TOTAL: &str = "leafscan_predictions_total";

    /// Prediction round-trip latency in seconds.
    pub const PREDICTION_LATENCY_SECONDS: &str = "leafscan_prediction_latency_seconds";

    /// Total health checks by result.
    pub const PINGS_TOTAL: &str = "leafscan_pings_total";
}

/// Record a completed prediction request.
pub fn record_prediction(outcome: &'static str, latency_secs: f64) {
    counter!(names::PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::PREDICTION_LATENCY_SECONDS).record(latency_secs);
}

/// Record a health check.
pub fn record_ping(healthy: bool) {
    let healthy = if healthy { "true" } else { "false" };
    counter!(names::PINGS_TOTAL, "healthy" => healthy).increment(1);
}
