//! Component synthesis stage
//!
//! Fans the planned components out to the code-generation capability with
//! bounded concurrency. A component that fails to synthesize is reported
//! and skipped; its siblings are unaffected. Test generation rides along
//! per component and never fails the component itself. Cancellation is
//! checked before every capability call: work in flight finishes, nothing
//! new starts.

use crate::{prompts, source_metrics};
use forge_capability::{
    call_with_timeout, CapabilityError, CodeGenRequest, CodeGenerationCapability,
};
use forge_spec::{
    ComponentDescriptor, ComponentKind, GeneratedComponent, GenerationContext, GenerationRequest,
    TechnicalSpecification,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Result of synthesizing one planned component
pub(crate) enum SynthesisOutcome {
    /// Component generated, measured, and ready for validation
    Success(Box<GeneratedComponent>),
    /// Component skipped; the rest of the batch proceeds
    Failure { name: String, reason: String },
}

/// Drives code generation for a component plan
pub(crate) struct ComponentSynthesizer {
    generation: Arc<dyn CodeGenerationCapability>,
    timeout: Duration,
    max_concurrency: usize,
}

impl ComponentSynthesizer {
    pub(crate) fn new(
        generation: Arc<dyn CodeGenerationCapability>,
        timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            generation,
            timeout,
            max_concurrency,
        }
    }

    /// Synthesize every planned component, preserving plan order
    ///
    /// `context` is the pipeline's working context (request context plus any
    /// analyzer enrichment). `cancel` gates every capability call: once
    /// tripped, components that have not started fail without reaching the
    /// capability.
    pub(crate) async fn synthesize_all(
        &self,
        request: &GenerationRequest,
        specification: &TechnicalSpecification,
        context: &GenerationContext,
        cancel: &CancellationToken,
    ) -> Vec<SynthesisOutcome> {
        let tests_enabled = request
            .options
            .generate_tests
            .unwrap_or(specification.quality.testing.generate_tests);

        let mut indexed: Vec<(usize, SynthesisOutcome)> =
            stream::iter(specification.components.iter().enumerate())
                .map(|(index, descriptor)| async move {
                    let outcome = self
                        .synthesize_one(
                            descriptor,
                            specification,
                            request,
                            context,
                            cancel,
                            tests_enabled,
                        )
                        .await;
                    (index, outcome)
                })
                .buffer_unordered(self.max_concurrency.max(1))
                .collect()
                .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, outcome)| outcome).collect()
    }

    async fn synthesize_one(
        &self,
        descriptor: &ComponentDescriptor,
        specification: &TechnicalSpecification,
        request: &GenerationRequest,
        context: &GenerationContext,
        cancel: &CancellationToken,
        tests_enabled: bool,
    ) -> SynthesisOutcome {
        if cancel.is_cancelled() {
            tracing::debug!("cancelled before synthesizing {}", descriptor.name);
            return SynthesisOutcome::Failure {
                name: descriptor.name.clone(),
                reason: "generation cancelled".to_string(),
            };
        }

        let prompt = prompts::component_prompt(descriptor, specification, request, context);
        let source = match self.generate(prompt, request, context).await {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!("component {} failed to synthesize: {err}", descriptor.name);
                return SynthesisOutcome::Failure {
                    name: descriptor.name.clone(),
                    reason: err.to_string(),
                };
            }
        };

        let test_source = if tests_enabled && !cancel.is_cancelled() {
            Some(self.synthesize_test(descriptor, request, context).await)
        } else {
            None
        };

        let dependencies = source_metrics::extract_imports(&source, &request.language);
        let metadata = source_metrics::measure(&source, test_source.as_deref());
        let file_path = component_path(descriptor, &request.language, request.framework.as_deref());

        tracing::debug!(
            "synthesized {} ({} lines, complexity {})",
            descriptor.name,
            metadata.line_count,
            metadata.complexity
        );

        let mut component =
            GeneratedComponent::new(descriptor.name.clone(), descriptor.kind, file_path, source)
                .with_dependencies(dependencies)
                .with_metadata(metadata);
        if let Some(tests) = test_source {
            component = component.with_test_source(tests);
        }
        SynthesisOutcome::Success(Box::new(component))
    }

    /// Generate a test file, falling back to a deterministic stub
    async fn synthesize_test(
        &self,
        descriptor: &ComponentDescriptor,
        request: &GenerationRequest,
        context: &GenerationContext,
    ) -> String {
        let prompt = prompts::test_prompt(descriptor, request);
        match self.generate(prompt, request, context).await {
            Ok(tests) => tests,
            Err(err) => {
                tracing::debug!("test generation for {} fell back to stub: {err}", descriptor.name);
                prompts::test_stub(descriptor, &request.language)
            }
        }
    }

    /// One capability call; blank output resolves to [`CapabilityError::Empty`]
    async fn generate(
        &self,
        prompt: String,
        request: &GenerationRequest,
        context: &GenerationContext,
    ) -> Result<String, CapabilityError> {
        let mut call = CodeGenRequest::new(prompt, &request.language).with_context(context.clone());
        if let Some(framework) = &request.framework {
            call = call.with_framework(framework);
        }
        let output = call_with_timeout(self.timeout, self.generation.generate(&call)).await?;
        if output.trim().is_empty() {
            return Err(CapabilityError::Empty);
        }
        Ok(output)
    }
}

/// Project-relative path for a synthesized component
pub(crate) fn component_path(
    descriptor: &ComponentDescriptor,
    language: &str,
    framework: Option<&str>,
) -> String {
    let extension = source_extension(language, framework, descriptor.kind);
    format!(
        "src/{}/{}.{}",
        descriptor.kind.dir_name(),
        descriptor.name,
        extension
    )
}

/// Companion test path for a component file path
pub(crate) fn test_path(file_path: &str) -> String {
    match file_path.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}.test.{extension}"),
        None => format!("{file_path}.test"),
    }
}

fn source_extension(language: &str, framework: Option<&str>, kind: ComponentKind) -> &'static str {
    let markup = matches!(framework, Some("react"))
        && matches!(
            kind,
            ComponentKind::Page | ComponentKind::Component | ComponentKind::Layout
        );
    match language {
        "typescript" => {
            if markup {
                "tsx"
            } else {
                "ts"
            }
        }
        "javascript" => {
            if markup {
                "jsx"
            } else {
                "js"
            }
        }
        "python" => "py",
        "rust" => "rs",
        "go" => "go",
        _ => "txt",
    }
}
