//! # Ledger Telemetry
//!
//! Structured logging for the asset chaincode and its development host,
//! built on `tracing` and `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!
//!     // Spans and events are now written to stderr
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CHAINCODE_SERVICE_NAME` | `asset-chaincode` | Service name in logs |
//! | `CHAINCODE_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `CHAINCODE_CONSOLE_OUTPUT` | `true` | Write logs at all |
//! | `CHAINCODE_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::build_filter;

use thiserror::Error;

#[doc(hidden)]
pub use tracing;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global subscriber.
///
/// Returns a guard to hold for the lifetime of the process. Fails if a
/// global subscriber is already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Span for one chaincode invocation.
///
/// # Example
///
/// ```rust,ignore
/// use ledger_telemetry::invocation_span;
///
/// let span = invocation_span!(tx_id, "create");
/// let _entered = span.enter();
/// ```
#[macro_export]
macro_rules! invocation_span {
    ($tx_id:expr, $function:expr) => {
        $crate::tracing::info_span!("invocation", tx_id = %$tx_id, function = %$function)
    };
    ($tx_id:expr, $function:expr, $($field:tt)*) => {
        $crate::tracing::info_span!(
            "invocation",
            tx_id = %$tx_id,
            function = %$function,
            $($field)*
        )
    };
}
