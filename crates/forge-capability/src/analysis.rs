//! Analysis capability contract
//!
//! Turns free-form prompt text into a canonical specification. The pipeline
//! never depends on this capability succeeding; a failed call falls back to
//! a minimal specification upstream.

use crate::error::CapabilityError;
use forge_spec::{GenerationContext, TechnicalSpecification};
use serde::{Deserialize, Serialize};

/// Call shape submitted to the analysis capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Prompt text to analyze (non-empty, enforced upstream)
    pub prompt: String,
    /// Target language
    pub language: String,
    /// Target framework, when chosen
    pub framework: Option<String>,
    /// Caller-supplied context
    pub context: GenerationContext,
}

/// Successful analysis outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Canonical specification derived from the prompt
    pub specification: TechnicalSpecification,
    /// Context enrichment the analyzer inferred, if any
    pub context: Option<GenerationContext>,
    /// Analyzer confidence in [0.0, 1.0]
    pub confidence: f64,
}

/// External capability that converts prompts into specifications
#[async_trait::async_trait]
pub trait AnalysisCapability: Send + Sync {
    /// Analyze one prompt
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, CapabilityError>;
}
