//! Prometheus metrics for the store runtime.
//!
//! The store records through the `metrics` facade, so nothing is collected
//! until a recorder is installed. [`PrometheusMetrics`] installs the
//! Prometheus recorder and renders the scrape text on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! use waymark_runtime::metrics::PrometheusMetrics;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut metrics = PrometheusMetrics::new();
//! metrics.install()?;
//! println!("{}", metrics.render().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder handle.
#[derive(Default)]
pub struct PrometheusMetrics {
    handle: Option<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Create an uninstalled recorder handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe the store metrics and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// Only one global recorder can exist per process. If one is already
    /// installed (several tests in one binary), this logs a warning, leaves
    /// `render()` returning `None` and succeeds.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Whether this handle owns the installed recorder.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.handle.is_some()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this handle did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register the store metric descriptions.
fn register_metrics() {
    describe_counter!(
        "waymark_store_actions_total",
        "Total number of actions reduced by the store worker"
    );
    describe_histogram!(
        "waymark_store_reducer_duration_seconds",
        "Time spent inside the reducer per action"
    );
    describe_counter!(
        "waymark_store_effects_total",
        "Total number of effects executed, by type"
    );
    describe_counter!(
        "waymark_store_rejected_actions_total",
        "Actions rejected because the store was shutting down"
    );
    describe_gauge!(
        "waymark_store_queue_depth",
        "Actions accepted but not yet fully processed"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reduced action.
    pub fn record_action(duration: Duration) {
        counter!("waymark_store_actions_total").increment(1);
        histogram!("waymark_store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record one executed effect of the given kind.
    pub fn record_effect(kind: &'static str) {
        counter!("waymark_store_effects_total", "type" => kind).increment(1);
    }

    /// Record an action rejected during shutdown.
    pub fn record_rejected() {
        counter!("waymark_store_rejected_actions_total").increment(1);
    }

    /// Publish the current queue depth.
    // Queue depths stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    pub fn set_queue_depth(depth: usize) {
        gauge!("waymark_store_queue_depth").set(depth as f64);
    }
}
