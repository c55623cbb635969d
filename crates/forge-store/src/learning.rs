//! In-memory learning store
//!
//! Reference implementation of the learning capability: signals grouped by
//! pattern type in a concurrent map, with simple retrieval queries for
//! analytics. Production deployments substitute a real learning service
//! behind the same trait.

use dashmap::DashMap;
use forge_capability::{CapabilityError, LearningCapability, LearningSignal};

/// Concurrent signal store grouped by pattern type
#[derive(Debug, Default)]
pub struct MemoryLearningStore {
    signals: DashMap<String, Vec<LearningSignal>>,
}

impl MemoryLearningStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All signals recorded for one pattern type
    #[must_use]
    pub fn signals_for(&self, pattern_type: &str) -> Vec<LearningSignal> {
        self.signals
            .get(pattern_type)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Success ratio for one pattern type, when any signals exist
    #[must_use]
    pub fn success_rate(&self, pattern_type: &str) -> Option<f64> {
        let entry = self.signals.get(pattern_type)?;
        if entry.is_empty() {
            return None;
        }
        let successes = entry.iter().filter(|signal| signal.success).count();
        #[allow(clippy::cast_precision_loss)]
        Some(successes as f64 / entry.len() as f64)
    }

    /// Total signals across all pattern types
    #[must_use]
    pub fn total_signals(&self) -> usize {
        self.signals.iter().map(|entry| entry.len()).sum()
    }
}

#[async_trait::async_trait]
impl LearningCapability for MemoryLearningStore {
    async fn record(&self, signal: LearningSignal) -> Result<(), CapabilityError> {
        self.signals
            .entry(signal.pattern_type.clone())
            .or_default()
            .push(signal);
        Ok(())
    }
}
