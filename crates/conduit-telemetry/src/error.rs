//! # Design
//!
//! - Three failure points: installing the subscriber, wiring a collector, and
//!   rendering the exposition text.
//! - Collector failures name the metric and the step that failed.

use prometheus::Error as PrometheusError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Step of collector wiring that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStep {
    /// Building the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

/// Errors raised while installing logging or serving metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("logging already initialised")]
    Logging {
        /// Subscriber install error.
        #[from]
        source: TryInitError,
    },
    /// A metric could not be built or registered.
    #[error("metric collector unavailable")]
    Collector {
        /// Metric name.
        name: &'static str,
        /// Failing step.
        step: CollectorStep,
        /// Prometheus error.
        source: PrometheusError,
    },
    /// The registry could not be rendered as text.
    #[error("metrics rendering failed")]
    Render {
        /// Prometheus error.
        source: PrometheusError,
    },
}

impl TelemetryError {
    pub(crate) const fn collector(
        name: &'static str,
        step: CollectorStep,
        source: PrometheusError,
    ) -> Self {
        Self::Collector { name, step, source }
    }
}
