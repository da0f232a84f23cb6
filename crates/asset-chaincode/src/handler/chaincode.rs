//! # Chaincode Entry Points
//!
//! [`Chaincode::init`] and [`Chaincode::invoke`] are what the runtime calls.
//! Every invocation produces exactly one [`Response`]: status 200 with the
//! operation's payload, or status 500 with the error message and an empty
//! payload.

use super::dispatcher::Dispatcher;
use crate::config::ChaincodeConfig;
use crate::domain::TransientMap;
use crate::ports::LedgerStore;
use crate::service::AssetLifecycleService;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Status of a successful invocation.
pub const STATUS_OK: u16 = 200;
/// Status of a failed invocation.
pub const STATUS_ERROR: u16 = 500;

// =============================================================================
// INVOCATION
// =============================================================================

/// One chaincode invocation as delivered by the runtime.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Function name, matched exactly.
    pub function: String,
    /// Positional string arguments.
    pub args: Vec<String>,
    /// Confidential inputs. Never logged.
    pub transient: TransientMap,
}

impl Invocation {
    pub fn new<S: Into<String>>(
        function: impl Into<String>,
        args: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
            transient: TransientMap::new(),
        }
    }

    /// Builder-style method to add a transient entry
    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.transient.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Invocation")
            .field("function", &self.function)
            .field("args", &self.args)
            .field("transient_keys", &keys)
            .finish()
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Invocation outcome returned to the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Error message; empty on success.
    pub message: String,
    /// Operation payload; empty on failure.
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

// =============================================================================
// CHAINCODE
// =============================================================================

/// The asset transfer chaincode.
#[derive(Clone)]
pub struct Chaincode {
    config: ChaincodeConfig,
    dispatcher: Dispatcher,
}

impl Chaincode {
    /// Chaincode with the standard function registry.
    pub fn new(config: ChaincodeConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::default())
    }

    pub fn with_dispatcher(config: ChaincodeConfig, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// Instantiation hook. There is no state to seed.
    pub fn init(&self) -> Response {
        info!(
            public = %self.config.public_collection,
            private = %self.config.private_collection,
            "Chaincode initialized"
        );
        Response::success(Vec::new())
    }

    /// Run one invocation against a ledger view.
    #[instrument(skip_all, fields(function = %invocation.function))]
    pub fn invoke<L: LedgerStore + ?Sized>(&self, ledger: &L, invocation: &Invocation) -> Response {
        let service = AssetLifecycleService::new(ledger, &self.config);
        match self.dispatcher.dispatch(&service, invocation) {
            Ok(payload) => {
                debug!(payload_len = payload.len(), "Invocation succeeded");
                Response::success(payload)
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "Invocation failed");
                Response::error(e.to_string())
            }
        }
    }
}

impl Default for Chaincode {
    fn default() -> Self {
        Self::new(ChaincodeConfig::default())
    }
}
