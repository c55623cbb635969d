//! Store contracts
//!
//! The pipeline reaches shared state only through these interfaces,
//! injected at engine construction. No module-level globals.

use crate::error::StoreError;
use forge_spec::{Fingerprint, GenerationResult, HistoryRecord};

/// Result cache keyed by request fingerprint
///
/// Later writers win on a shared fingerprint; concurrent equal requests
/// are not coalesced.
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    /// Look up a cached result
    async fn get(&self, fingerprint: &Fingerprint)
        -> Result<Option<GenerationResult>, StoreError>;

    /// Store a result under its fingerprint, replacing any previous entry
    async fn put(
        &self,
        fingerprint: Fingerprint,
        result: GenerationResult,
    ) -> Result<(), StoreError>;

    /// Drop a cached result
    async fn invalidate(&self, fingerprint: &Fingerprint) -> Result<(), StoreError>;
}

/// Append-only generation history
///
/// Unbounded by contract; retention is an operational concern of the
/// backing implementation.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one record
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError>;

    /// Up to `limit` most recent records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;

    /// All records for one project, in append order
    async fn for_project(&self, project_id: &str) -> Result<Vec<HistoryRecord>, StoreError>;
}
