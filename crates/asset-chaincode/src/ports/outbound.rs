//! # Driven Ports (SPI - Outbound)
//!
//! The ledger runtime the chaincode runs against. Adapters implement
//! [`LedgerStore`] to provide private-data access for one invocation.
//!
//! ## Cursor Ownership
//!
//! Range and rich queries return a [`ResultsIterator`] that owns the
//! runtime cursor. The cursor is closed when the iterator is dropped, so
//! every exit path (success, `?` early return, unwinding) releases it.

use crate::errors::StoreError;
use tracing::warn;

// =============================================================================
// KEY/VALUE
// =============================================================================

/// One query result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    /// Ledger key.
    pub key: String,
    /// Stored bytes.
    pub value: Vec<u8>,
}

impl KeyValue {
    /// Create a result entry.
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// =============================================================================
// CURSOR
// =============================================================================

/// Runtime-held cursor over query results.
pub trait QueryCursor {
    /// Next result, or `None` when exhausted.
    fn next_result(&mut self) -> Option<Result<KeyValue, StoreError>>;

    /// Release the runtime resources held by the cursor.
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Owned handle over a [`QueryCursor`]; closes it on drop.
pub struct ResultsIterator<'a> {
    cursor: Box<dyn QueryCursor + 'a>,
    closed: bool,
}

impl<'a> ResultsIterator<'a> {
    /// Take ownership of a cursor.
    pub fn new(cursor: impl QueryCursor + 'a) -> Self {
        Self {
            cursor: Box::new(cursor),
            closed: false,
        }
    }

    /// Close explicitly and surface a close failure.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.closed = true;
        self.cursor.close()
    }
}

impl Iterator for ResultsIterator<'_> {
    type Item = Result<KeyValue, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.cursor.next_result()
    }
}

impl Drop for ResultsIterator<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.cursor.close() {
            warn!(error = %e, "Failed to close query cursor");
        }
    }
}

// =============================================================================
// LEDGER STORE
// =============================================================================

/// Private data access provided by the ledger runtime.
///
/// ## Implementation Notes
///
/// - Reads return `Ok(None)` for absent keys; `Err` is reserved for
///   runtime failures.
/// - Deleting an absent key succeeds.
/// - Range queries are ascending by key, `start_key` inclusive and
///   `end_key` exclusive; an empty key leaves that side unbounded.
/// - Rich queries fail with [`StoreError::QueryEngineUnsupported`] when the
///   state database cannot evaluate them.
pub trait LedgerStore: Send + Sync {
    /// Read a value from a collection.
    fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value to a collection.
    fn put_private_data(&self, collection: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key from a collection.
    fn del_private_data(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Range scan over a collection.
    fn get_private_data_by_range(
        &self,
        collection: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_>, StoreError>;

    /// Rich (selector) query over a collection.
    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<ResultsIterator<'_>, StoreError>;
}

// =============================================================================
// TESTS
// =============================================================================
