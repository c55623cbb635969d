//! Architecture enhancement stage
//!
//! Consults the architectural-reasoning capability and merges its proposal
//! into the specification under strict precedence: explicit request fields
//! first, analyzer output second, capability proposal last. The merge is a
//! pure function; the pipeline never stalls on this capability.

use forge_capability::{call_with_timeout, ArchitectureCapability, ArchitectureRequest};
use forge_spec::{
    ArchitectureOverrides, ArchitectureSpec, GenerationContext, GenerationRequest,
    TechnicalSpecification,
};
use std::sync::Arc;
use std::time::Duration;

/// Merges capability proposals into specifications
pub(crate) struct ArchitectureEnhancer {
    architecture: Arc<dyn ArchitectureCapability>,
    timeout: Duration,
}

impl ArchitectureEnhancer {
    pub(crate) fn new(architecture: Arc<dyn ArchitectureCapability>, timeout: Duration) -> Self {
        Self {
            architecture,
            timeout,
        }
    }

    /// Enhance the specification's architecture in place
    ///
    /// Returns whether the stage fell back to the neutral proposal.
    pub(crate) async fn enhance(
        &self,
        request: &GenerationRequest,
        specification: &mut TechnicalSpecification,
        context: &GenerationContext,
    ) -> bool {
        let call = ArchitectureRequest {
            specification: specification.clone(),
            context: context.clone(),
            language: request.language.clone(),
            framework: request.framework.clone(),
        };

        let (proposal, degraded) =
            match call_with_timeout(self.timeout, self.architecture.process(&call)).await {
                Ok(outcome) => {
                    tracing::debug!(
                        "architecture proposal: {} (confidence {:.2})",
                        outcome.architecture.style,
                        outcome.confidence
                    );
                    (outcome.architecture, false)
                }
                Err(err) => {
                    tracing::warn!("architecture capability failed, using neutral fallback: {err}");
                    (ArchitectureSpec::layered(), true)
                }
            };

        specification.architecture =
            merge_architecture(&request.architecture, &specification.architecture, &proposal);
        degraded
    }
}

/// Merge three architecture sources under strict precedence
///
/// Explicit request fields override analyzer output, which overrides the
/// capability proposal. An analyzer that never committed (zero confidence)
/// counts as silent. Patterns merge as an ordered union unless overridden.
/// Pure: equal inputs always produce the equal merge.
#[must_use]
pub(crate) fn merge_architecture(
    overrides: &ArchitectureOverrides,
    analyzed: &ArchitectureSpec,
    proposed: &ArchitectureSpec,
) -> ArchitectureSpec {
    let analyzer_committed = !analyzed.is_default();

    let style = overrides.style.clone().unwrap_or_else(|| {
        if analyzer_committed {
            analyzed.style.clone()
        } else {
            proposed.style.clone()
        }
    });

    let layers = overrides.layers.clone().unwrap_or_else(|| {
        if analyzer_committed && !analyzed.layers.is_empty() {
            analyzed.layers.clone()
        } else {
            proposed.layers.clone()
        }
    });

    let patterns = overrides.patterns.clone().unwrap_or_else(|| {
        let mut merged = analyzed.patterns.clone();
        for pattern in &proposed.patterns {
            if !merged.contains(pattern) {
                merged.push(pattern.clone());
            }
        }
        merged
    });

    // Explicit fields pin the shape outright
    let confidence = if overrides.is_empty() {
        analyzed.confidence.max(proposed.confidence)
    } else {
        1.0
    };

    ArchitectureSpec {
        style,
        layers,
        patterns,
        confidence,
    }
}
