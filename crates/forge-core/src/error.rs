//! Error types for the generation pipeline
//!
//! Only two classes of fault abort a request: missing required input and
//! true internal faults. Capability failures are absorbed into stage
//! fallbacks and never appear here.

use thiserror::Error;

/// Stable machine-readable error codes
///
/// Carried alongside the human-readable message so callers can branch
/// without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Required input missing or malformed
    ValidationError,
    /// Unexpected internal fault
    SystemError,
    /// Request cancelled by the caller
    Cancelled,
}

impl ErrorCode {
    /// Stable snake_case code string
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::SystemError => "system_error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal pipeline error
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Request is missing required input for its mode
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unexpected internal fault (malformed state, illegal transition)
    #[error("internal fault: {0}")]
    System(String),

    /// Caller cancelled the request
    #[error("generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Validation failure with a reason
    #[inline]
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Internal fault with a reason
    #[inline]
    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self::System(message.into())
    }

    /// The stable code for this error
    #[inline]
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::System(_) => ErrorCode::SystemError,
            Self::Cancelled => ErrorCode::Cancelled,
        }
    }

    /// Whether the caller can fix this by changing the request
    #[inline]
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
