//! # Asset Lifecycle Service
//!
//! Implements [`AssetLifecycleApi`] over one invocation's ledger view.
//!
//! ## Existence Rules
//!
//! | Operation | Requires | Writes |
//! |-----------|----------|--------|
//! | `create` | Absent | public, then private |
//! | `transfer` | Present | public only |
//! | `delete` | Present | deletes public, then private |
//!
//! ## Partial Failure
//!
//! The two writes of `create` and the two deletes of `delete` are separate
//! store calls with no compensation. If the second one fails, the first has
//! already been issued; the runtime is expected to discard the write set of
//! a failed invocation.
//!
//! ## Logging
//!
//! Spans carry the asset name only. The secret is never a log field.

use crate::config::ChaincodeConfig;
use crate::domain::{
    render_query_results, Asset, AssetConfidentialDetails, CreateAssetInput, DeleteAssetInput,
    TransferAssetInput, ASSET_DOC_TYPE,
};
use crate::errors::{ChaincodeError, ChaincodeResult, RecordKind};
use crate::ports::{AssetLifecycleApi, LedgerStore};
use crate::store::{AssetRecordStore, Partition};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

/// Lifecycle operations for one invocation.
pub struct AssetLifecycleService<'a, L: LedgerStore + ?Sized> {
    records: AssetRecordStore<'a, L>,
}

impl<'a, L: LedgerStore + ?Sized> AssetLifecycleService<'a, L> {
    /// Build the service over a ledger view.
    pub fn new(ledger: &'a L, config: &'a ChaincodeConfig) -> Self {
        Self {
            records: AssetRecordStore::new(ledger, config),
        }
    }

    /// Selector used by `query_by_owner`.
    #[must_use]
    pub fn owner_selector(owner: &str) -> String {
        json!({ "selector": { "docType": ASSET_DOC_TYPE, "owner": owner } }).to_string()
    }

    fn require_present(&self, partition: Partition, name: &str) -> ChaincodeResult<Vec<u8>> {
        self.records.get(partition, name)?.ok_or_else(|| {
            let kind = match partition {
                Partition::Public => RecordKind::Asset,
                Partition::PrivateDetails => RecordKind::ConfidentialDetails,
            };
            ChaincodeError::NotFound {
                kind,
                name: name.to_string(),
            }
        })
    }

    fn render_range(&self, start_key: &str, end_key: &str) -> ChaincodeResult<Vec<u8>> {
        let results = self.records.range_query(Partition::Public, start_key, end_key)?;
        render_query_results(results)
    }

    fn render_selector(&self, expression: &str) -> ChaincodeResult<Vec<u8>> {
        let results = self.records.selector_query(Partition::Public, expression)?;
        render_query_results(results)
    }
}

impl<L: LedgerStore + ?Sized> AssetLifecycleApi for AssetLifecycleService<'_, L> {
    #[instrument(skip_all, fields(name = %input.name))]
    fn create(&self, input: CreateAssetInput) -> ChaincodeResult<()> {
        if self.records.get(Partition::Public, &input.name)?.is_some() {
            warn!("Asset already exists");
            return Err(ChaincodeError::AlreadyExists { name: input.name });
        }

        let asset = Asset::new(input.name.as_str(), input.owner.as_str());
        self.records
            .put(Partition::Public, &asset.name, &asset.to_json()?)?;

        let details = AssetConfidentialDetails::new(input.name, input.secret);
        self.records
            .put(Partition::PrivateDetails, &details.name, &details.to_json()?)?;

        info!(owner = %asset.owner, "Asset created");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read(&self, name: &str) -> ChaincodeResult<Vec<u8>> {
        self.require_present(Partition::Public, name)
    }

    #[instrument(skip(self))]
    fn read_confidential_details(&self, name: &str) -> ChaincodeResult<Vec<u8>> {
        self.require_present(Partition::PrivateDetails, name)
    }

    #[instrument(skip_all, fields(name = %input.name))]
    fn transfer(&self, input: TransferAssetInput) -> ChaincodeResult<()> {
        let stored = self.require_present(Partition::Public, &input.name)?;
        let mut asset = Asset::from_json(&input.name, &stored)?;
        // A rewrite under another key would orphan the confidential details
        if asset.name != input.name {
            warn!(stored_name = %asset.name, "Stored asset name does not match its key");
            return Err(ChaincodeError::CorruptRecord {
                name: input.name,
                reason: format!("record names asset {}", asset.name),
            });
        }

        let previous_owner = std::mem::replace(&mut asset.owner, input.owner);
        self.records
            .put(Partition::Public, &input.name, &asset.to_json()?)?;

        info!(from = %previous_owner, to = %asset.owner, "Asset transferred");
        Ok(())
    }

    #[instrument(skip_all, fields(name = %input.name))]
    fn delete(&self, input: DeleteAssetInput) -> ChaincodeResult<()> {
        let stored = self.require_present(Partition::Public, &input.name)?;
        // Decoded so a corrupt record is reported instead of silently removed
        let asset = Asset::from_json(&input.name, &stored)?;

        self.records.delete(Partition::Public, &input.name)?;
        self.records.delete(Partition::PrivateDetails, &input.name)?;

        info!(owner = %asset.owner, "Asset deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn range_by_name(&self, start_key: &str, end_key: &str) -> ChaincodeResult<Vec<u8>> {
        let payload = self.render_range(start_key, end_key)?;
        debug!(bytes = payload.len(), "Range query rendered");
        Ok(payload)
    }

    #[instrument(skip(self))]
    fn query_by_owner(&self, owner: &str) -> ChaincodeResult<Vec<u8>> {
        let selector = Self::owner_selector(owner);
        let payload = self.render_selector(&selector)?;
        debug!(bytes = payload.len(), "Owner query rendered");
        Ok(payload)
    }

    #[instrument(skip(self))]
    fn query_ad_hoc(&self, selector: &str) -> ChaincodeResult<Vec<u8>> {
        let payload = self.render_selector(selector)?;
        debug!(bytes = payload.len(), "Ad hoc query rendered");
        Ok(payload)
    }
}

// =============================================================================
// TESTS
// =============================================================================
