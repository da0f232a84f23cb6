//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `AssetLifecycleApi`
//! - **Driven Port (Outbound)**: `LedgerStore`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
