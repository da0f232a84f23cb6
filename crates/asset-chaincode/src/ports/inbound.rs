//! # Driving Ports (API - Inbound)
//!
//! The lifecycle API the dispatcher drives. One implementation,
//! [`AssetLifecycleService`](crate::service::AssetLifecycleService), is
//! built per invocation over the invocation's ledger view.

use crate::domain::{CreateAssetInput, DeleteAssetInput, TransferAssetInput};
use crate::errors::ChaincodeResult;

/// Asset lifecycle operations.
///
/// ## State Machine (per asset name)
///
/// ```text
///            create               delete
///   Absent ─────────→ Present ─────────→ Absent
///                      │   ↑
///                      └───┘ transfer
/// ```
pub trait AssetLifecycleApi {
    /// Create the public and private records. Fails with `AlreadyExists`.
    fn create(&self, input: CreateAssetInput) -> ChaincodeResult<()>;

    /// Stored public record bytes. Fails with `NotFound`.
    fn read(&self, name: &str) -> ChaincodeResult<Vec<u8>>;

    /// Stored private record bytes. Fails with `NotFound`.
    fn read_confidential_details(&self, name: &str) -> ChaincodeResult<Vec<u8>>;

    /// Replace the owner on the public record. Fails with `NotFound`.
    fn transfer(&self, input: TransferAssetInput) -> ChaincodeResult<()>;

    /// Remove both records. Fails with `NotFound`.
    fn delete(&self, input: DeleteAssetInput) -> ChaincodeResult<()>;

    /// Public records with `start_key <= name < end_key`.
    fn range_by_name(&self, start_key: &str, end_key: &str) -> ChaincodeResult<Vec<u8>>;

    /// Public records owned by `owner` (rich query).
    fn query_by_owner(&self, owner: &str) -> ChaincodeResult<Vec<u8>>;

    /// Public records matching a caller-supplied selector (rich query).
    fn query_ad_hoc(&self, selector: &str) -> ChaincodeResult<Vec<u8>>;
}
