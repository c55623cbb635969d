//! Asynchronous learning feedback
//!
//! Completed generations emit one learning signal on a spawned task. The
//! signal never sits on the result path: the caller returns immediately
//! and a failed delivery is logged and forgotten.

use forge_capability::{LearningCapability, LearningSignal};
use forge_spec::{GenerationInput, GenerationRequest, GenerationResult};
use serde_json::json;
use std::sync::Arc;

/// Emits fire-and-forget learning signals
pub(crate) struct FeedbackRecorder {
    learning: Arc<dyn LearningCapability>,
}

impl FeedbackRecorder {
    pub(crate) fn new(learning: Arc<dyn LearningCapability>) -> Self {
        Self { learning }
    }

    /// Record a completed generation without blocking on delivery
    pub(crate) fn record_completion(&self, request: &GenerationRequest, result: &GenerationResult) {
        let signal = completion_signal(request, result);
        let learning = Arc::clone(&self.learning);
        tokio::spawn(async move {
            if let Err(err) = learning.record(signal).await {
                tracing::warn!("learning feedback dropped: {err}");
            }
        });
    }
}

fn completion_signal(request: &GenerationRequest, result: &GenerationResult) -> LearningSignal {
    let input = match &request.input {
        GenerationInput::Prompt(prompt) => prompt.clone(),
        GenerationInput::Blueprint(blueprint) => blueprint.id.clone(),
        GenerationInput::Specification(specification) => specification.name.clone(),
        GenerationInput::ExampleCode(example) => example.clone(),
    };

    let files: Vec<&str> = result
        .components
        .iter()
        .map(|component| component.file_path.as_str())
        .collect();

    LearningSignal::new(
        "generation-pipeline",
        request.mode().name(),
        input,
        result.meets_threshold(request.options.min_quality_score),
    )
    .with_output(json!({
        "files": files,
        "architecture": result.architecture.style,
    }))
    .with_metadata(json!({
        "quality_score": result.quality_score,
        "component_count": result.components.len(),
        "validated": result.validated,
        "degraded": result.degraded,
        "generation_time_ms": result.metrics.generation_time_ms,
    }))
}
