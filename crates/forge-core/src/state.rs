//! Per-request state machine
//!
//! `Received → (CacheHit → Completed) | (Analyzed → Enhanced → Synthesizing
//! → Validated → Scored → Completed)`, with `Failed` terminal reachable from
//! any non-terminal state. Capability-level failures are absorbed into
//! fallbacks and never reach `Failed`.

use crate::error::GenerationError;

/// Pipeline position of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    /// Request accepted, nothing run yet
    Received,
    /// Cache returned a stored result
    CacheHit,
    /// Specification produced
    Analyzed,
    /// Architecture merged
    Enhanced,
    /// Component fan-out in flight
    Synthesizing,
    /// Validation stage finished (possibly via fallback)
    Validated,
    /// Quality score computed
    Scored,
    /// Result assembled and persisted
    Completed,
    /// Aborted without a result
    Failed,
}

impl RequestState {
    /// Whether this state ends the request
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::CacheHit => "cache-hit",
            Self::Analyzed => "analyzed",
            Self::Enhanced => "enhanced",
            Self::Synthesizing => "synthesizing",
            Self::Validated => "validated",
            Self::Scored => "scored",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: RequestState) -> Vec<RequestState> {
    use RequestState::{
        Analyzed, CacheHit, Completed, Enhanced, Failed, Received, Scored, Synthesizing,
        Validated,
    };
    match from {
        Received => vec![CacheHit, Analyzed, Failed],
        CacheHit => vec![Completed, Failed],
        Analyzed => vec![Enhanced, Failed],
        Enhanced => vec![Synthesizing, Failed],
        Synthesizing => vec![Validated, Failed],
        Validated => vec![Scored, Failed],
        Scored => vec![Completed, Failed],
        Completed | Failed => vec![],
    }
}

/// Validate one transition
///
/// # Errors
/// Returns a system fault if the transition is not allowed; an illegal
/// transition means the pipeline itself is broken, not the request.
pub fn validate_transition(from: RequestState, to: RequestState) -> Result<(), GenerationError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(GenerationError::system(format!(
            "illegal state transition: {from} -> {to}"
        )))
    }
}

fn allowed(from: RequestState, to: RequestState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

/// Tracks one request through the machine, validating every step
#[derive(Debug)]
pub(crate) struct StateTracker {
    current: RequestState,
}

impl StateTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: RequestState::Received,
        }
    }

    pub(crate) fn current(&self) -> RequestState {
        self.current
    }

    /// Advance to `to`, failing the request on an illegal step
    pub(crate) fn advance(&mut self, to: RequestState) -> Result<(), GenerationError> {
        validate_transition(self.current, to)?;
        tracing::debug!("request state: {} -> {}", self.current, to);
        self.current = to;
        Ok(())
    }
}
