//! Structured logging via `tracing-subscriber`.
//!
//! JSON output carries the same fields as the human-readable form:
//! - `timestamp`, `level`, `target`
//! - `component`: election, permit or tally
//! - `tx_id`: transaction id, for correlating a request with its commit
//! - Additional context fields
//!
//! Permit secrets are never logged, only their hashes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );
    Ok(())
}

/// Log a component event with standard fields.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = %$component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transaction event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $component:expr, $function:expr, $tx_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = %$component,
            function = %$function,
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}
