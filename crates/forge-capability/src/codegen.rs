//! Code-generation capability contract
//!
//! Produces source text for one component prompt at a time. Calls are
//! independent per component; a failed call drops that component only.

use crate::error::CapabilityError;
use forge_spec::GenerationContext;
use serde::{Deserialize, Serialize};

/// Call shape submitted to the code-generation capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeGenRequest {
    /// Component-level generation prompt
    pub prompt: String,
    /// Target language
    pub language: String,
    /// Target framework, when chosen
    pub framework: Option<String>,
    /// Caller-supplied context
    pub context: GenerationContext,
}

impl CodeGenRequest {
    /// New request with empty context
    #[must_use]
    pub fn new(prompt: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            language: language.into(),
            framework: None,
            context: GenerationContext::default(),
        }
    }

    /// With target framework
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// With caller context
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: GenerationContext) -> Self {
        self.context = context;
        self
    }
}

/// External capability that generates source text
///
/// The returned text is not guaranteed deterministic across calls; callers
/// must not assume byte-stable output for equal prompts.
#[async_trait::async_trait]
pub trait CodeGenerationCapability: Send + Sync {
    /// Generate source text for one prompt
    async fn generate(&self, request: &CodeGenRequest) -> Result<String, CapabilityError>;
}
