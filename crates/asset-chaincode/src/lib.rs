//! # Private Asset Transfer Chaincode
//!
//! Manages named assets on a permissioned ledger, split across two private
//! data collections:
//!
//! | Record | Collection | Fields |
//! |--------|------------|--------|
//! | `Asset` | public (`collectionAssets`) | `docType`, `name`, `owner` |
//! | `AssetConfidentialDetails` | private (`collectionAssetPrivateDetails`) | `docType`, `name`, `secret` |
//!
//! Mutating functions take their inputs from the transient map so the
//! secret never appears in the transaction arguments.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Public and private records exist together | `service.rs` - `create`/`delete` write both |
//! | `create` never overwrites | `service.rs` - existence check before any write |
//! | `transfer` never touches the secret | `service.rs` - public partition only |
//! | No store access on invalid input | `handler/registry.rs` - decode before calling the service |
//! | Query cursors are always released | `ports/outbound.rs` - `ResultsIterator` closes on drop |
//! | Secrets never reach errors or logs | `domain/entities.rs` - `Secret` redacts `Debug` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  handler/  - Chaincode entry points, registry, dispatcher       │
//! │  adapters/ - InMemoryLedger, TxSimulator, selector engine      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - AssetLifecycleApi trait                   │
//! │  ports/outbound.rs - LedgerStore, QueryCursor traits           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs     - Asset, AssetConfidentialDetails      │
//! │  domain/transient.rs    - typed transient inputs               │
//! │  domain/query_result.rs - query result rendering               │
//! │  errors.rs              - ChaincodeError, InputError           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use asset_chaincode::prelude::*;
//!
//! let ledger = InMemoryLedger::new();
//! let chaincode = Chaincode::new(ChaincodeConfig::default());
//!
//! let create = Invocation::new("create", Vec::<String>::new()).with_transient(
//!     "asset",
//!     br#"{"name":"Asset1","owner":"tom","secret":"h1"}"#.to_vec(),
//! );
//! assert!(chaincode.invoke(&ledger, &create).is_success());
//!
//! let read = chaincode.invoke(&ledger, &Invocation::new("read", ["Asset1"]));
//! assert_eq!(read.payload, br#"{"docType":"Asset","name":"Asset1","owner":"tom"}"#);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod ports;
pub mod service;
pub mod store;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used items.
pub mod prelude {
    pub use crate::adapters::{InMemoryLedger, StateDatabase, TxSimulator};
    pub use crate::config::ChaincodeConfig;
    pub use crate::domain::{
        Asset, AssetConfidentialDetails, CreateAssetInput, DeleteAssetInput, Secret,
        TransferAssetInput, TransientMap,
    };
    pub use crate::errors::{ChaincodeError, ChaincodeResult, InputError, StoreError};
    pub use crate::handler::{Chaincode, Dispatcher, FunctionRegistry, Invocation, Response};
    pub use crate::ports::{AssetLifecycleApi, LedgerStore};
    pub use crate::service::AssetLifecycleService;
}
