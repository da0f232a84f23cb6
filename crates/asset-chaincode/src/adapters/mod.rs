//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the [`LedgerStore`](crate::ports::LedgerStore)
//! port. A deployed chaincode is given its ledger view by the peer; these
//! adapters back the tests and the development host.

pub mod memory_ledger;
pub mod selector;
pub mod tx_simulator;

pub use memory_ledger::{InMemoryLedger, StateDatabase, WriteOp};
pub use selector::SelectorQuery;
pub use tx_simulator::TxSimulator;
