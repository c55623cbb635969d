//! Forge Core - Generation Orchestration Pipeline
//!
//! The pipeline that turns one generation request into generated source
//! components:
//! - Admits requests and short-circuits on fingerprint cache hits
//! - Converges every input mode to a canonical specification
//! - Merges architecture proposals under explicit precedence rules
//! - Fans component synthesis out with bounded concurrency
//! - Validates, scores, and assembles the final result
//! - Records history and emits asynchronous learning feedback
//!
//! Capability failures degrade individual stages; they never abort the
//! request. Only missing input, internal faults, and cancellation do.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_core::{GenerationOrchestrator, OrchestratorConfig};
//! use forge_spec::{GenerationInput, GenerationRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = GenerationOrchestrator::new(
//!     OrchestratorConfig::new(),
//!     capabilities,
//!     learning,
//!     results,
//!     history,
//! );
//!
//! let request = GenerationRequest::new(
//!     GenerationInput::Prompt("Create a task tracker".into()),
//!     "typescript",
//! );
//! let result = orchestrator.generate(request).await?;
//!
//! println!("quality {:.1}", result.quality_score);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod state;

// Pipeline stages
mod analyze;
mod enhance;
mod normalize;
mod packaging;
mod prompts;
mod recorder;
mod scoring;
mod source_metrics;
mod synthesize;

// Re-exports for convenience
pub use config::OrchestratorConfig;
pub use error::{ErrorCode, GenerationError};
pub use orchestrator::GenerationOrchestrator;
pub use state::{allowed_transitions, validate_transition, RequestState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the generation pipeline
    pub use crate::{GenerationError, GenerationOrchestrator, OrchestratorConfig, RequestState};
    pub use forge_capability::CapabilitySet;
    pub use forge_spec::{GenerationInput, GenerationRequest, GenerationResult};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
