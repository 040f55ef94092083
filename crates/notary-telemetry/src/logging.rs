//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! pretty console layer (development) or a JSON layer (containers). JSON
//! lines carry `timestamp`, `level`, `target`, span fields and the message,
//! which log shippers can parse without further configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the level filter for a configuration.
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
///
/// # Errors
///
/// `TelemetryError::Config` if the configured directive does not parse.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Initialize the global logging subscriber.
///
/// # Errors
///
/// - `TelemetryError::Config` - the log level directive is invalid
/// - `TelemetryError::LoggingInit` - a global subscriber is already installed
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        return Ok(());
    }

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Log a transaction-scoped event with the standard `tx_id` field.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $tx_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}
