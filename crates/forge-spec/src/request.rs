//! Generation requests
//!
//! Defines the inbound side of the pipeline:
//! - Request identity and immutable request payloads
//! - The closed set of input variants (prompt, blueprint, specification, example)
//! - Structured generation context (domain, complexity, personality, palette)
//! - Per-request options and thresholds

use crate::specification::TechnicalSpecification;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

/// A generation request
///
/// Created once at call time and never mutated afterwards. Exactly one input
/// variant is authoritative; everything else is advisory context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Request identity
    pub id: RequestId,
    /// Requesting user
    pub user_id: String,
    /// Target project
    pub project_id: String,
    /// Authoritative input variant
    pub input: GenerationInput,
    /// Target language (e.g. "typescript")
    pub language: String,
    /// Target framework (e.g. "react")
    pub framework: Option<String>,
    /// Structured generation context
    pub context: GenerationContext,
    /// Explicit architecture overrides (top merge precedence)
    pub architecture: ArchitectureOverrides,
    /// Per-request options and thresholds
    pub options: RequestOptions,
}

impl GenerationRequest {
    /// Create new request with a generated ID and default context
    #[must_use]
    pub fn new(input: GenerationInput, language: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            user_id: String::new(),
            project_id: String::new(),
            input,
            language: language.into(),
            framework: None,
            context: GenerationContext::default(),
            architecture: ArchitectureOverrides::default(),
            options: RequestOptions::default(),
        }
    }

    /// With requesting user
    #[inline]
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// With target project
    #[inline]
    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// With target framework
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// With generation context
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: GenerationContext) -> Self {
        self.context = context;
        self
    }

    /// With explicit architecture overrides
    #[inline]
    #[must_use]
    pub fn with_architecture(mut self, overrides: ArchitectureOverrides) -> Self {
        self.architecture = overrides;
        self
    }

    /// With request options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// The input mode selected by this request
    #[inline]
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.input.mode()
    }
}

/// The authoritative input of a request
///
/// Exactly one variant per request; the serde boundary rejects anything else,
/// so an unrecognized mode cannot enter the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GenerationInput {
    /// Natural-language prompt
    Prompt(String),
    /// Reference to an upstream blueprint-processing result
    Blueprint(BlueprintRef),
    /// Explicit, already-canonical specification
    Specification(Box<TechnicalSpecification>),
    /// Example source to infer from
    ExampleCode(String),
}

impl GenerationInput {
    /// Mode discriminant for this input
    #[inline]
    #[must_use]
    pub fn mode(&self) -> InputMode {
        match self {
            Self::Prompt(_) => InputMode::Prompt,
            Self::Blueprint(_) => InputMode::Blueprint,
            Self::Specification(_) => InputMode::Specification,
            Self::ExampleCode(_) => InputMode::ExampleCode,
        }
    }
}

/// Input mode discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputMode {
    /// Natural-language prompt
    Prompt,
    /// Blueprint reference
    Blueprint,
    /// Explicit specification
    Specification,
    /// Example code
    ExampleCode,
}

impl InputMode {
    /// Stable lowercase name (fingerprinting, learning pattern types)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Blueprint => "blueprint",
            Self::Specification => "specification",
            Self::ExampleCode => "example-code",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to an upstream blueprint-processing result
///
/// The blueprint processor runs outside the pipeline; when it has resolved
/// the reference its result travels along as `manifest`. A missing manifest
/// means the reference could not be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintRef {
    /// Blueprint identifier
    pub id: String,
    /// Resolved blueprint metadata, if resolution succeeded
    pub manifest: Option<BlueprintManifest>,
}

impl BlueprintRef {
    /// Reference that failed to resolve
    #[inline]
    #[must_use]
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            manifest: None,
        }
    }

    /// Reference carrying its resolved manifest
    #[inline]
    #[must_use]
    pub fn resolved(manifest: BlueprintManifest) -> Self {
        Self {
            id: manifest.id.clone(),
            manifest: Some(manifest),
        }
    }
}

/// Blueprint metadata produced by the upstream processor
///
/// Fields the processor did not fill default to empty collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintManifest {
    /// Blueprint identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Architecture style, when declared
    pub architecture_style: Option<String>,
    /// Architectural layers
    pub layers: Vec<String>,
    /// Technology stack entries
    pub technologies: Vec<String>,
    /// Declared components
    pub components: Vec<crate::specification::ComponentDescriptor>,
    /// Declared data entities
    pub entities: Vec<crate::specification::DataEntity>,
}

/// Structured generation context
///
/// A closed shape with named optional fields; absent fields fall back to the
/// documented defaults instead of travelling as an open dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Application domain (e.g. "e-commerce")
    pub domain: Option<String>,
    /// Requested complexity tier
    pub complexity: ComplexityTier,
    /// Brand personality (e.g. "playful")
    pub personality: Option<String>,
    /// Preferred color palette (hex strings)
    pub color_palette: Vec<String>,
}

impl GenerationContext {
    /// Create empty context with default complexity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With application domain
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// With complexity tier
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    /// With brand personality
    #[inline]
    #[must_use]
    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = Some(personality.into());
        self
    }

    /// With color palette
    #[inline]
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.color_palette = palette;
        self
    }
}

/// Requested complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    /// Minimal feature surface
    Simple,
    /// Typical application scope
    Moderate,
    /// Rich feature surface
    Complex,
}

impl ComplexityTier {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

impl Default for ComplexityTier {
    fn default() -> Self {
        Self::Moderate
    }
}

/// Explicit architecture fields set on the request
///
/// These take top precedence when the enhancer merges architectures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureOverrides {
    /// Forced architecture style
    pub style: Option<String>,
    /// Forced layer set
    pub layers: Option<Vec<String>>,
    /// Forced pattern set
    pub patterns: Option<Vec<String>>,
}

impl ArchitectureOverrides {
    /// No overrides
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether any field is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.layers.is_none() && self.patterns.is_none()
    }
}

/// Per-request options and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Consult and populate the result cache
    pub use_cache: bool,
    /// Run the validation capability over the synthesized files
    pub validate: bool,
    /// Force test generation on/off; `None` defers to the quality policy
    pub generate_tests: Option<bool>,
    /// Minimum quality score counted as a successful outcome
    pub min_quality_score: f64,
}

impl RequestOptions {
    /// Default options (cache on, validation on, threshold 70)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With caching toggled
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// With validation toggled
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// With forced test generation
    #[inline]
    #[must_use]
    pub fn with_tests(mut self, generate_tests: bool) -> Self {
        self.generate_tests = Some(generate_tests);
        self
    }

    /// With minimum quality score
    #[inline]
    #[must_use]
    pub fn with_min_quality(mut self, score: f64) -> Self {
        self.min_quality_score = score;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            validate: true,
            generate_tests: None,
            min_quality_score: 70.0,
        }
    }
}
