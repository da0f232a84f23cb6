//! # Asset Record Store
//!
//! Thin wrapper over the [`LedgerStore`] port that names the two logical
//! partitions and classifies runtime failures into read and write errors.

use crate::config::ChaincodeConfig;
use crate::errors::{ChaincodeResult, StoreError};
use crate::ports::{LedgerStore, ResultsIterator};

/// Logical partition of the asset namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Public `Asset` records.
    Public,
    /// Private `AssetConfidentialDetails` records.
    PrivateDetails,
}

/// Partitioned view of one invocation's ledger.
pub struct AssetRecordStore<'a, L: LedgerStore + ?Sized> {
    ledger: &'a L,
    config: &'a ChaincodeConfig,
}

impl<'a, L: LedgerStore + ?Sized> AssetRecordStore<'a, L> {
    /// Wrap a ledger view.
    pub fn new(ledger: &'a L, config: &'a ChaincodeConfig) -> Self {
        Self { ledger, config }
    }

    /// Collection name backing a partition.
    #[must_use]
    pub fn collection(&self, partition: Partition) -> &'a str {
        match partition {
            Partition::Public => &self.config.public_collection,
            Partition::PrivateDetails => &self.config.private_collection,
        }
    }

    pub fn get(&self, partition: Partition, key: &str) -> ChaincodeResult<Option<Vec<u8>>> {
        self.ledger
            .get_private_data(self.collection(partition), key)
            .map_err(StoreError::into_read_error)
    }

    pub fn put(&self, partition: Partition, key: &str, value: &[u8]) -> ChaincodeResult<()> {
        self.ledger
            .put_private_data(self.collection(partition), key, value)
            .map_err(StoreError::into_write_error)
    }

    /// Delete a key. Absent keys are not an error here; callers check
    /// existence first.
    pub fn delete(&self, partition: Partition, key: &str) -> ChaincodeResult<()> {
        self.ledger
            .del_private_data(self.collection(partition), key)
            .map_err(StoreError::into_write_error)
    }

    pub fn range_query(
        &self,
        partition: Partition,
        start_key: &str,
        end_key: &str,
    ) -> ChaincodeResult<ResultsIterator<'a>> {
        self.ledger
            .get_private_data_by_range(self.collection(partition), start_key, end_key)
            .map_err(StoreError::into_read_error)
    }

    pub fn selector_query(
        &self,
        partition: Partition,
        expression: &str,
    ) -> ChaincodeResult<ResultsIterator<'a>> {
        self.ledger
            .get_private_data_query_result(self.collection(partition), expression)
            .map_err(StoreError::into_read_error)
    }
}
