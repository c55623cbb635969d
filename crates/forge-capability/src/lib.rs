//! Forge capability contracts
//!
//! Abstract contracts for the external services the generation pipeline
//! coordinates. The pipeline owns sequencing, merging, and fallback; the
//! capabilities own everything behind these traits.
//!
//! # Core Concepts
//!
//! - [`AnalysisCapability`]: prompt → canonical specification
//! - [`ArchitectureCapability`]: specification → architecture proposal
//! - [`CodeGenerationCapability`]: component prompt → source text
//! - [`ValidationCapability`]: file set → compliance score
//! - [`LearningCapability`]: outcome → best-effort record
//! - [`call_with_timeout`]: deadline guard every call runs under
//!
//! Each call resolves to an explicit `Result`; fallback behavior is the
//! caller's visible contract, never an inline catch.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod analysis;
mod architecture;
mod codegen;
mod error;
mod learning;
mod timeout;
mod validation;

// Re-exports
pub use analysis::{AnalysisCapability, AnalysisOutcome, AnalysisRequest};
pub use architecture::{ArchitectureCapability, ArchitectureOutcome, ArchitectureRequest};
pub use codegen::{CodeGenRequest, CodeGenerationCapability};
pub use error::CapabilityError;
pub use learning::{LearningCapability, LearningSignal};
pub use timeout::call_with_timeout;
pub use validation::{SourceFile, ValidationCapability, ValidationOutcome};

use std::sync::Arc;

/// The four synchronous-path capabilities the pipeline is built from
///
/// Grouped for injection; the learning capability travels separately
/// because it never sits on the result path.
#[derive(Clone)]
pub struct CapabilitySet {
    /// Prompt analysis
    pub analysis: Arc<dyn AnalysisCapability>,
    /// Architectural reasoning
    pub architecture: Arc<dyn ArchitectureCapability>,
    /// Per-component code generation
    pub generation: Arc<dyn CodeGenerationCapability>,
    /// File-set validation
    pub validation: Arc<dyn ValidationCapability>,
}

impl CapabilitySet {
    /// Bundle four capability implementations
    #[must_use]
    pub fn new(
        analysis: Arc<dyn AnalysisCapability>,
        architecture: Arc<dyn ArchitectureCapability>,
        generation: Arc<dyn CodeGenerationCapability>,
        validation: Arc<dyn ValidationCapability>,
    ) -> Self {
        Self {
            analysis,
            architecture,
            generation,
            validation,
        }
    }
}

impl std::fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilitySet").finish_non_exhaustive()
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
