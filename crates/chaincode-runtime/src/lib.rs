//! # Chaincode Runtime
//!
//! Development host for the asset chaincode. Reads JSON invocation requests
//! line by line, runs each one in its own simulated transaction against an
//! in-memory ledger, and writes one JSON reply per request.
//!
//! ## Modules
//!
//! - `config` - `HostConfig` from the environment
//! - `wire` - request/reply line protocol
//! - `host` - `ChaincodeHost`, simulation and commit

pub mod config;
pub mod host;
pub mod wire;

pub use config::HostConfig;
pub use host::{ChaincodeHost, Execution};
pub use wire::{InvocationReply, InvocationRequest, PayloadEncoding, WireError};
