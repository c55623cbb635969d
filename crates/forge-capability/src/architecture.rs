//! Architectural-reasoning capability contract
//!
//! Proposes an architecture for a specification-in-progress. The proposal
//! sits at the bottom of the merge precedence: explicit request fields and
//! analyzer output both override it.

use crate::error::CapabilityError;
use forge_spec::{ArchitectureSpec, GenerationContext, TechnicalSpecification};
use serde::{Deserialize, Serialize};

/// Call shape submitted to the architecture capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureRequest {
    /// Specification as it stands after analysis
    pub specification: TechnicalSpecification,
    /// Caller-supplied context
    pub context: GenerationContext,
    /// Target language
    pub language: String,
    /// Target framework, when chosen
    pub framework: Option<String>,
}

/// Successful architectural-reasoning outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureOutcome {
    /// Proposed architecture
    pub architecture: ArchitectureSpec,
    /// Free-text reasoning behind the proposal
    pub reasoning: String,
    /// Capability confidence in [0.0, 1.0]
    pub confidence: f64,
}

/// External capability that reasons about application architecture
#[async_trait::async_trait]
pub trait ArchitectureCapability: Send + Sync {
    /// Propose an architecture for one specification
    async fn process(
        &self,
        request: &ArchitectureRequest,
    ) -> Result<ArchitectureOutcome, CapabilityError>;
}
