//! Learning capability contract
//!
//! Best-effort outcome recording for future retrieval. Calls never sit on
//! the result path; a lost signal is logged by the caller and forgotten.

use crate::error::CapabilityError;
use serde::{Deserialize, Serialize};

/// One observed generation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSignal {
    /// Originating subsystem (e.g. "generation-pipeline")
    pub source: String,
    /// Pattern category (the request's input mode name)
    pub pattern_type: String,
    /// Salient input (prompt text, blueprint id, or equivalent)
    pub input: String,
    /// Salient output (generated file names, architecture style)
    pub output: serde_json::Value,
    /// Whether the outcome counted as a success
    pub success: bool,
    /// Free-form metadata (scores, timings)
    pub metadata: serde_json::Value,
}

impl LearningSignal {
    /// New signal with empty output and metadata
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        pattern_type: impl Into<String>,
        input: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            source: source.into(),
            pattern_type: pattern_type.into(),
            input: input.into(),
            output: serde_json::Value::Null,
            success,
            metadata: serde_json::Value::Null,
        }
    }

    /// With salient output
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: serde_json::Value) -> Self {
        self.output = output;
        self
    }

    /// With metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// External capability that records generation outcomes
#[async_trait::async_trait]
pub trait LearningCapability: Send + Sync {
    /// Record one signal (best-effort)
    async fn record(&self, signal: LearningSignal) -> Result<(), CapabilityError>;
}
