//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters the auth action surface reports.

use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{CollectorStep, Result, TelemetryError};

/// Outcome label recorded for each sign-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The identity provider accepted the attempt.
    Success,
    /// Input failed validation before reaching a provider.
    Invalid,
    /// The provider rejected the credentials.
    Rejected,
    /// The provider could not be reached or misbehaved.
    Failed,
}

impl SignInOutcome {
    /// Label value used in the exposition format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Invalid => "invalid",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    sign_in_attempts_total: IntCounterVec,
    sign_out_total: IntCounter,
    active_sessions: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Sessions currently held by the session registry.
    pub active_sessions: i64,
    /// Total sign-out actions processed.
    pub sign_out_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::collector("http_requests_total", CollectorStep::Build, source))?;
        let sign_in_attempts_total = IntCounterVec::new(
            Opts::new(
                "sign_in_attempts_total",
                "Sign-in attempts by provider and outcome",
            ),
            &["provider", "outcome"],
        )
        .map_err(|source| TelemetryError::collector("sign_in_attempts_total", CollectorStep::Build, source))?;
        let sign_out_total = IntCounter::with_opts(Opts::new(
            "sign_out_total",
            "Sign-out actions processed",
        ))
        .map_err(|source| TelemetryError::collector("sign_out_total", CollectorStep::Build, source))?;
        let active_sessions =
            IntGauge::with_opts(Opts::new("active_sessions", "Sessions currently issued"))
                .map_err(|source| TelemetryError::collector("active_sessions", CollectorStep::Build, source))?;

        register(&registry, "http_requests_total", http_requests_total.clone())?;
        register(
            &registry,
            "sign_in_attempts_total",
            sign_in_attempts_total.clone(),
        )?;
        register(&registry, "sign_out_total", sign_out_total.clone())?;
        register(&registry, "active_sessions", active_sessions.clone())?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                sign_in_attempts_total,
                sign_out_total,
                active_sessions,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record a sign-in attempt for the named provider.
    pub fn inc_sign_in(&self, provider: &str, outcome: SignInOutcome) {
        self.inner
            .sign_in_attempts_total
            .with_label_values(&[provider, outcome.as_str()])
            .inc();
    }

    /// Record a processed sign-out.
    pub fn inc_sign_out(&self) {
        self.inner.sign_out_total.inc();
    }

    /// Set the active session gauge.
    pub fn set_active_sessions(&self, count: i64) {
        self.inner.active_sessions.set(count);
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if a gathered metric family cannot be encoded.
    pub fn render(&self) -> Result<String> {
        TextEncoder::new()
            .encode_to_string(&self.inner.registry.gather())
            .map_err(|source| TelemetryError::Render { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            active_sessions: self.inner.active_sessions.get(),
            sign_out_total: self.inner.sign_out_total.get(),
        }
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: C) -> Result<()>
where
    C: prometheus::core::Collector + 'static,
{
    registry
        .register(Box::new(collector))
        .map_err(|source| TelemetryError::collector(name, CollectorStep::Register, source))
}
