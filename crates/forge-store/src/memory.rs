//! In-memory store implementations
//!
//! Default backing for tests and single-process deployments:
//! - [`MemoryResultStore`]: bounded LRU cache over moka
//! - [`MemoryHistoryStore`]: append-only vector behind a mutex

use crate::error::StoreError;
use crate::traits::{HistoryStore, ResultStore};
use forge_spec::{Fingerprint, GenerationResult, HistoryRecord};
use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Bounded in-memory result cache
///
/// Fingerprint-addressed with LRU eviction and optional TTL. Cheap to
/// clone; clones share the same cache.
#[derive(Debug, Clone)]
pub struct MemoryResultStore {
    inner: Cache<Fingerprint, Arc<GenerationResult>>,
}

impl MemoryResultStore {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoryResultStore {
    /// Create cache with default capacity (1,000 entries)
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[async_trait::async_trait]
impl ResultStore for MemoryResultStore {
    async fn get(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<GenerationResult>, StoreError> {
        Ok(self
            .inner
            .get(fingerprint)
            .await
            .map(|result| (*result).clone()))
    }

    async fn put(
        &self,
        fingerprint: Fingerprint,
        result: GenerationResult,
    ) -> Result<(), StoreError> {
        self.inner.insert(fingerprint, Arc::new(result)).await;
        Ok(())
    }

    async fn invalidate(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        self.inner.invalidate(fingerprint).await;
        Ok(())
    }
}

/// Unbounded in-memory history log
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    inner: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    /// Create empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the history is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        self.inner.lock().push(record);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let guard = self.inner.lock();
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    async fn for_project(&self, project_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        let guard = self.inner.lock();
        Ok(guard
            .iter()
            .filter(|record| record.project_id == project_id)
            .cloned()
            .collect())
    }
}
