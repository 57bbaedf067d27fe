//! sui-ledger-client: Ledger collaborator contract for the CLAMM toolkit
//!
//! The toolkit never talks to a fullnode directly; everything it needs from
//! the ledger is expressed by the [`LedgerClient`] trait: idempotent object
//! reads, dynamic-field enumeration, and read-only simulated execution
//! (dev-inspect). Production deployments implement the trait on top of
//! whatever transport they use; tests inject in-memory doubles.

pub mod coin_meta;
pub mod object;
pub mod record;

use clamm_core::{LedgerError, ObjectId};
use sui_ptb::TransactionDraft;

pub use coin_meta::{CoinMetadata, CoinMetadataCache};
pub use object::{
    CommandResult, DevInspectResults, DynamicFieldInfo, DynamicFieldPage, ObjectData, ReturnValue,
};

/// Result type for ledger client operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Read-only ledger access.
///
/// All methods are idempotent reads with no side effects on ledger state.
/// Timeouts and retries are the transport's concern, not the trait's.
#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// Fetch a single object with its content.
    ///
    /// Absent objects surface as [`LedgerError::ObjectNotFound`].
    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData>;

    /// Fetch several objects in one round-trip, preserving request order.
    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectData>>;

    /// List one page of dynamic fields under a parent object.
    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<String>,
    ) -> Result<DynamicFieldPage>;

    /// Evaluate a transaction draft without committing it.
    ///
    /// Returns per-command results; return values are raw BCS bytes paired
    /// with their type tags.
    async fn dev_inspect(&self, draft: &TransactionDraft, sender: &str)
        -> Result<DevInspectResults>;

    /// Fetch coin metadata for a (normalized) coin type, `None` when the
    /// ledger has no metadata object for it.
    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>>;
}
