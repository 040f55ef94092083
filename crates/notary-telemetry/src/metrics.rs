//! Prometheus metrics for the notary ledger.
//!
//! All metrics follow the naming convention: `nl_<subject>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Crate metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INVOCATION METRICS
    // =========================================================================

    /// Contract invocations by function and outcome
    pub static ref INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("nl_invocations_total", "Contract invocations"),
        &["function", "outcome"]  // outcome: ok or an error kind
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Instruments issued
    pub static ref INSTRUMENTS_ISSUED: Counter = Counter::new(
        "nl_instruments_issued_total",
        "Total number of instruments issued"
    ).expect("metric creation failed");

    /// Instruments revoked
    pub static ref INSTRUMENTS_REVOKED: Counter = Counter::new(
        "nl_instruments_revoked_total",
        "Total number of instruments revoked"
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Commits rejected by the read-set check
    pub static ref COMMIT_CONFLICTS: Counter = Counter::new(
        "nl_commit_conflicts_total",
        "Commits rejected because a read key changed"
    ).expect("metric creation failed");

    /// Notifications relayed to the bus
    pub static ref NOTIFICATIONS_PUBLISHED: Counter = Counter::new(
        "nl_notifications_published_total",
        "Committed notifications relayed to subscribers"
    ).expect("metric creation failed");
}

/// Register all metrics with the crate registry.
///
/// Safe to call more than once; metrics already registered are skipped.
///
/// # Errors
///
/// `TelemetryError::MetricsInit` if the registry rejects a metric for any
/// reason other than a repeat registration.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INVOCATIONS.clone()),
        Box::new(INSTRUMENTS_ISSUED.clone()),
        Box::new(INSTRUMENTS_REVOKED.clone()),
        Box::new(COMMIT_CONFLICTS.clone()),
        Box::new(NOTIFICATIONS_PUBLISHED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Record one contract invocation.
pub fn record_invocation(function: &str, outcome: &str) {
    INVOCATIONS.with_label_values(&[function, outcome]).inc();
}

/// Encode all metrics as Prometheus text format.
///
/// # Errors
///
/// `TelemetryError::MetricsInit` if encoding fails.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
