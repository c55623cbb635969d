//! Capability call errors

use std::time::Duration;
use thiserror::Error;

/// Errors a capability call can resolve to
///
/// Every external call ends in exactly one of these or a success; there is
/// no "maybe worked" state for fallback policies to guess about.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Capability could not serve the call
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its deadline
    #[error("capability call timed out after {limit:?}")]
    TimedOut {
        /// The deadline that was exceeded
        limit: Duration,
    },

    /// Call succeeded but carried no usable data
    #[error("capability returned no usable data")]
    Empty,
}

impl CapabilityError {
    /// Unavailable with a reason
    #[inline]
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Whether this failure was a deadline overrun
    #[inline]
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_lowercase() {
        let err = CapabilityError::unavailable("model offline");
        assert_eq!(err.to_string(), "capability unavailable: model offline");
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout_predicate() {
        let err = CapabilityError::TimedOut {
            limit: Duration::from_secs(30),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }
}
