//! Request admission: input validation and the cache gate
//!
//! First stage of every request. Checks mode-required input, computes the
//! fingerprint, and short-circuits on a cache hit before any capability
//! call is made.

use crate::error::GenerationError;
use forge_spec::{Fingerprint, GenerationInput, GenerationRequest, GenerationResult};
use forge_store::ResultStore;
use std::sync::Arc;

/// Outcome of request admission
pub(crate) enum Admission {
    /// Serve this stored result; no downstream stage runs
    CacheHit(Box<GenerationResult>),
    /// Run the pipeline under this fingerprint
    Proceed(Fingerprint),
}

/// Validates requests and fronts the result cache
pub(crate) struct RequestGate {
    results: Arc<dyn ResultStore>,
}

impl RequestGate {
    pub(crate) fn new(results: Arc<dyn ResultStore>) -> Self {
        Self { results }
    }

    /// Validate required input, fingerprint the request, consult the cache
    pub(crate) async fn admit(
        &self,
        request: &GenerationRequest,
    ) -> Result<Admission, GenerationError> {
        validate_request(request)?;
        let fingerprint = Fingerprint::of_request(request);

        if request.options.use_cache {
            match self.results.get(&fingerprint).await {
                Ok(Some(result)) => {
                    tracing::info!("cache hit for fingerprint {}", fingerprint.short());
                    return Ok(Admission::CacheHit(Box::new(result)));
                }
                Ok(None) => {}
                Err(err) => {
                    // A cache fault degrades to a miss
                    tracing::warn!("result cache read failed: {err}");
                }
            }
        }

        Ok(Admission::Proceed(fingerprint))
    }

    /// Write-back on completion
    ///
    /// Cache faults never fail a finished request; the result already
    /// exists and is returned regardless.
    pub(crate) async fn store(&self, fingerprint: Fingerprint, result: &GenerationResult) {
        if let Err(err) = self.results.put(fingerprint, result.clone()).await {
            tracing::warn!("result cache write failed: {err}");
        }
    }
}

/// Canonicalize language and framework before fingerprinting
///
/// Case and surrounding whitespace never change what gets generated, so
/// they must not change the fingerprint either. A framework that is blank
/// after trimming counts as absent.
pub(crate) fn normalize_request(request: &mut GenerationRequest) {
    request.language = request.language.trim().to_lowercase();
    if let Some(framework) = request.framework.take() {
        let framework = framework.trim().to_lowercase();
        request.framework = (!framework.is_empty()).then_some(framework);
    }
}

/// Check that the mode-required input is present and usable
pub(crate) fn validate_request(request: &GenerationRequest) -> Result<(), GenerationError> {
    if request.language.trim().is_empty() {
        return Err(GenerationError::validation("target language is required"));
    }
    match &request.input {
        GenerationInput::Prompt(prompt) if prompt.trim().is_empty() => {
            Err(GenerationError::validation("prompt is empty"))
        }
        GenerationInput::Blueprint(blueprint) if blueprint.manifest.is_none() => {
            Err(GenerationError::validation(format!(
                "blueprint {} could not be resolved",
                blueprint.id
            )))
        }
        GenerationInput::ExampleCode(code) if code.trim().is_empty() => {
            Err(GenerationError::validation("example code is empty"))
        }
        _ => Ok(()),
    }
}
