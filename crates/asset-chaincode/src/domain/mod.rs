//! # Domain Layer
//!
//! Pure logic with no store access: records, transient input decoding and
//! query result rendering.

pub mod entities;
pub mod query_result;
pub mod transient;

pub use entities::*;
pub use query_result::*;
pub use transient::*;
