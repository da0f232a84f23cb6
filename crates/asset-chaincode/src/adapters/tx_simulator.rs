//! Transaction simulation over an [`InMemoryLedger`].
//!
//! Writes and deletes are buffered in a write set; reads and queries see
//! committed state only, as a Fabric endorser does. The write set reaches
//! the ledger through [`TxSimulator::commit`]. Dropping the simulator
//! discards it, so a failed invocation leaves no partial state behind.

use super::memory_ledger::{InMemoryLedger, WriteOp};
use crate::errors::StoreError;
use crate::ports::{LedgerStore, ResultsIterator};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Buffered ledger view for one invocation.
pub struct TxSimulator<'l> {
    ledger: &'l InMemoryLedger,
    write_set: Mutex<BTreeMap<(String, String), Option<Vec<u8>>>>,
}

impl<'l> TxSimulator<'l> {
    pub fn new(ledger: &'l InMemoryLedger) -> Self {
        Self {
            ledger,
            write_set: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of buffered mutations (last write per key wins).
    pub fn pending_writes(&self) -> Result<usize, StoreError> {
        Ok(self
            .write_set
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .len())
    }

    /// Apply the write set to the ledger. Returns the number of mutations.
    pub fn commit(self) -> Result<usize, StoreError> {
        let write_set = self
            .write_set
            .into_inner()
            .map_err(|_| StoreError::LockPoisoned)?;
        let ops: Vec<WriteOp> = write_set
            .into_iter()
            .map(|((collection, key), value)| (collection, key, value))
            .collect();
        let applied = self.ledger.apply_write_set(ops)?;
        debug!(applied, "Write set committed");
        Ok(applied)
    }

    /// Drop the write set without applying it.
    pub fn discard(self) {
        let pending = self.pending_writes().unwrap_or(0);
        debug!(pending, "Write set discarded");
    }

    fn buffer(
        &self,
        collection: &str,
        key: &str,
        value: Option<Vec<u8>>,
    ) -> Result<(), StoreError> {
        self.write_set
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert((collection.to_string(), key.to_string()), value);
        Ok(())
    }
}

impl LedgerStore for TxSimulator<'_> {
    fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.ledger.get_private_data(collection, key)
    }

    fn put_private_data(
        &self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), StoreError> {
        self.buffer(collection, key, Some(value.to_vec()))
    }

    fn del_private_data(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.buffer(collection, key, None)
    }

    fn get_private_data_by_range(
        &self,
        collection: &str,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        self.ledger
            .get_private_data_by_range(collection, start_key, end_key)
    }

    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<ResultsIterator<'_>, StoreError> {
        self.ledger.get_private_data_query_result(collection, query)
    }
}
