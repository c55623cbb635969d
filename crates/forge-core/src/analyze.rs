//! Specification analysis stage
//!
//! Dispatches on the request's input mode and converges every variant to a
//! canonical specification:
//! - Prompt: delegates to the analysis capability, minimal fallback on failure
//! - Blueprint: local mapping from the resolved manifest
//! - Explicit specification: accepted as-is
//! - Example code: architecture and stack inferred from the source text
//!
//! Whatever the path, the returned plan is never empty.

use crate::error::GenerationError;
use crate::source_metrics;
use forge_capability::{call_with_timeout, AnalysisCapability, AnalysisRequest};
use forge_spec::{
    ArchitectureSpec, BlueprintManifest, GenerationContext, GenerationInput, GenerationRequest,
    QualityPolicy, TechnicalSpecification, TechnologyStack,
};
use std::sync::Arc;
use std::time::Duration;

/// Analysis stage output
pub(crate) struct Analyzed {
    pub specification: TechnicalSpecification,
    pub context: GenerationContext,
    pub degraded: bool,
}

/// Converges requests to canonical specifications
pub(crate) struct SpecificationAnalyzer {
    analysis: Arc<dyn AnalysisCapability>,
    timeout: Duration,
}

impl SpecificationAnalyzer {
    pub(crate) fn new(analysis: Arc<dyn AnalysisCapability>, timeout: Duration) -> Self {
        Self { analysis, timeout }
    }

    /// Produce the canonical specification for one request
    ///
    /// Required-input checks already ran at admission. On return the
    /// specification has at least one planned component.
    pub(crate) async fn analyze(
        &self,
        request: &GenerationRequest,
    ) -> Result<Analyzed, GenerationError> {
        let mut analyzed = match &request.input {
            GenerationInput::Prompt(prompt) => self.analyze_prompt(request, prompt).await,
            GenerationInput::Blueprint(blueprint) => {
                let manifest = blueprint.manifest.as_ref().ok_or_else(|| {
                    GenerationError::system(format!(
                        "blueprint {} lost its manifest after admission",
                        blueprint.id
                    ))
                })?;
                from_blueprint(manifest, request)
            }
            GenerationInput::Specification(specification) => Analyzed {
                specification: specification.as_ref().clone(),
                context: request.context.clone(),
                degraded: false,
            },
            GenerationInput::ExampleCode(code) => from_example(code, request),
        };

        analyzed.specification.ensure_root_component();
        Ok(analyzed)
    }

    async fn analyze_prompt(&self, request: &GenerationRequest, prompt: &str) -> Analyzed {
        let call = AnalysisRequest {
            prompt: prompt.to_string(),
            language: request.language.clone(),
            framework: request.framework.clone(),
            context: request.context.clone(),
        };

        match call_with_timeout(self.timeout, self.analysis.analyze(&call)).await {
            Ok(outcome) => {
                tracing::debug!(
                    "analysis produced {} components (confidence {:.2})",
                    outcome.specification.component_count(),
                    outcome.confidence
                );
                Analyzed {
                    specification: outcome.specification,
                    context: outcome.context.unwrap_or_else(|| request.context.clone()),
                    degraded: false,
                }
            }
            Err(err) => {
                tracing::warn!("analysis capability failed, using minimal specification: {err}");
                Analyzed {
                    specification: fallback_specification(request),
                    context: request.context.clone(),
                    degraded: true,
                }
            }
        }
    }
}

/// Minimal default specification used when analysis fails
///
/// Single root component, layered architecture, standard quality policy.
pub(crate) fn fallback_specification(request: &GenerationRequest) -> TechnicalSpecification {
    let mut specification = TechnicalSpecification::minimal(app_name(request), &request.language);
    specification.stack.framework = request.framework.clone();
    if let GenerationInput::Prompt(prompt) = &request.input {
        specification.description = truncate(prompt, 120);
    }
    specification
}

fn from_blueprint(manifest: &BlueprintManifest, request: &GenerationRequest) -> Analyzed {
    let architecture = manifest.architecture_style.as_ref().map_or_else(
        ArchitectureSpec::layered,
        |style| ArchitectureSpec {
            style: style.clone(),
            layers: manifest.layers.clone(),
            patterns: Vec::new(),
            confidence: 0.8,
        },
    );

    let name = if manifest.name.is_empty() {
        manifest.id.clone()
    } else {
        manifest.name.clone()
    };

    Analyzed {
        specification: TechnicalSpecification {
            name,
            description: manifest.description.clone(),
            features: Vec::new(),
            architecture,
            components: manifest.components.clone(),
            entities: manifest.entities.clone(),
            stack: TechnologyStack {
                language: request.language.clone(),
                framework: request.framework.clone(),
                libraries: manifest.technologies.clone(),
                build_tool: None,
            },
            quality: QualityPolicy::standard(),
        },
        context: request.context.clone(),
        degraded: false,
    }
}

fn from_example(code: &str, request: &GenerationRequest) -> Analyzed {
    let libraries = source_metrics::extract_imports(code, &request.language);
    let patterns = detect_patterns(code);

    Analyzed {
        specification: TechnicalSpecification {
            name: "inferred-from-example".to_string(),
            description: "Application inferred from example code".to_string(),
            features: Vec::new(),
            architecture: ArchitectureSpec::example_derived(patterns),
            // Left empty here; the shared enrichment guarantee plants the root
            components: Vec::new(),
            entities: Vec::new(),
            stack: TechnologyStack {
                language: request.language.clone(),
                framework: request.framework.clone(),
                libraries,
                build_tool: None,
            },
            quality: QualityPolicy::standard(),
        },
        context: request.context.clone(),
        degraded: false,
    }
}

fn detect_patterns(code: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    if code.contains("useState") || code.contains("useEffect") {
        patterns.push("hooks".to_string());
    }
    if code.contains("async ") || code.contains("await ") {
        patterns.push("async".to_string());
    }
    if code.contains("class ") {
        patterns.push("classes".to_string());
    }
    patterns
}

fn app_name(request: &GenerationRequest) -> String {
    request
        .context
        .domain
        .as_deref()
        .map_or_else(|| "generated-app".to_string(), |domain| format!("{domain}-app"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
