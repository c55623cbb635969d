//! Validation capability contract
//!
//! Reviews a full synthesized file set and reports a compliance score with
//! error and warning lists.

use crate::error::CapabilityError;
use serde::{Deserialize, Serialize};

/// One file submitted for validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Project-relative path
    pub path: String,
    /// File content
    pub content: String,
}

impl SourceFile {
    /// New source file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Successful validation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Compliance score in [0.0, 100.0]
    pub score: f64,
    /// Blocking problems found
    pub errors: Vec<String>,
    /// Non-blocking observations
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// Clean outcome with a perfect score
    #[must_use]
    pub fn clean() -> Self {
        Self {
            score: 100.0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// External capability that validates generated file sets
#[async_trait::async_trait]
pub trait ValidationCapability: Send + Sync {
    /// Validate one file set
    async fn validate(&self, files: &[SourceFile]) -> Result<ValidationOutcome, CapabilityError>;
}
