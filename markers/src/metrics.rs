//! Metrics for remote marker operations.
//!
//! Recorded from inside the reducer's effects, through the `metrics` facade.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Describe the marker metrics.
///
/// Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(
        "waymark_remote_requests_total",
        "Remote marker store requests, by operation and outcome"
    );
    describe_histogram!(
        "waymark_remote_request_duration_seconds",
        "Remote marker store request latency, by operation"
    );
    describe_gauge!("waymark_markers", "Markers in the session list");
}

/// Remote store metrics recorder.
pub struct RemoteMetrics;

impl RemoteMetrics {
    /// Record one remote request.
    pub fn record(operation: &'static str, succeeded: bool, duration: Duration) {
        let outcome = if succeeded { "ok" } else { "error" };
        counter!(
            "waymark_remote_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        histogram!("waymark_remote_request_duration_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Publish the size of the marker list.
    #[allow(clippy::cast_precision_loss)] // marker counts stay tiny
    pub fn set_marker_count(count: usize) {
        gauge!("waymark_markers").set(count as f64);
    }
}
