//! # Notary Telemetry
//!
//! Observability for the notary ledger.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with env filter, pretty or JSON output
//! - **Metrics**: Prometheus counters on a crate registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notary_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NL_SERVICE_NAME` | `notary-ledger` | Service name in log lines |
//! | `NL_LOG_LEVEL` | `info` | Log level filter |
//! | `NL_JSON_LOGS` | `false` | JSON formatted output |
//! | `NL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
pub mod logging;
pub mod metrics;

#[doc(hidden)]
pub use tracing;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, record_invocation, register_metrics, COMMIT_CONFLICTS, INSTRUMENTS_ISSUED,
    INSTRUMENTS_REVOKED, INVOCATIONS, NOTIFICATIONS_PUBLISHED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// # Errors
///
/// Propagates failures from [`register_metrics`] and [`init_logging`].
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;
    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
