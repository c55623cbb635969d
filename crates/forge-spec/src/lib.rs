//! Forge generation data model
//!
//! Typed requests, specifications, components, and results shared by every
//! pipeline stage.
//!
//! # Core Concepts
//!
//! - [`GenerationRequest`]: Immutable request with exactly one authoritative input
//! - [`TechnicalSpecification`]: Canonical shape all input modes converge to
//! - [`GeneratedComponent`]: One synthesized source file with measured metadata
//! - [`GenerationResult`]: Final assembled output with score and metrics
//! - [`Fingerprint`]: 32-byte Blake3 cache key over semantically relevant fields
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_spec::{Fingerprint, GenerationInput, GenerationRequest};
//!
//! let request = GenerationRequest::new(
//!     GenerationInput::Prompt("Create a login form".into()),
//!     "typescript",
//! )
//! .with_framework("react");
//!
//! // Equivalent requests share a cache key
//! let key = Fingerprint::of_request(&request);
//! println!("fingerprint: {}", key.short());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod component;
mod fingerprint;
mod request;
mod result;
mod specification;

// Re-exports
pub use component::{ComponentId, ComponentMetadata, GeneratedComponent};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use request::{
    ArchitectureOverrides, BlueprintManifest, BlueprintRef, ComplexityTier, GenerationContext,
    GenerationInput, GenerationRequest, InputMode, RequestId, RequestOptions,
};
pub use result::{
    FailureInfo, GenerationMetrics, GenerationResult, HistoryRecord, RequestStatus,
    ValidationReport,
};
pub use specification::{
    ArchitectureSpec, ComponentDescriptor, ComponentKind, DataEntity, EntityField, QualityPolicy,
    TechnicalSpecification, TechnologyStack, TestingStrategy,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
