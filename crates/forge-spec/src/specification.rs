//! Canonical technical specification
//!
//! Every input mode is analyzed into this shape before planning starts:
//! - Application identity and feature list
//! - Architecture (style, layers, patterns, confidence)
//! - Component plan and data entities
//! - Technology stack and quality policy

use serde::{Deserialize, Serialize};

/// Canonical specification all input modes converge to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSpecification {
    /// Application name
    pub name: String,
    /// Short description
    pub description: String,
    /// Feature list
    pub features: Vec<String>,
    /// Architectural shape
    pub architecture: ArchitectureSpec,
    /// Planned components
    pub components: Vec<ComponentDescriptor>,
    /// Data entities
    pub entities: Vec<DataEntity>,
    /// Technology stack
    pub stack: TechnologyStack,
    /// Quality policy
    pub quality: QualityPolicy,
}

impl TechnicalSpecification {
    /// Minimal but well-formed specification
    ///
    /// Used as the analysis fallback: one root component, layered
    /// architecture, standard quality policy.
    #[must_use]
    pub fn minimal(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "Generated application".to_string(),
            features: Vec::new(),
            architecture: ArchitectureSpec::layered(),
            components: vec![ComponentDescriptor::root()],
            entities: Vec::new(),
            stack: TechnologyStack::new(language),
            quality: QualityPolicy::standard(),
        }
    }

    /// Guarantee at least one root-level component is planned
    ///
    /// Analyzers for sparse inputs can legitimately produce an empty plan;
    /// downstream stages rely on a non-empty one.
    pub fn ensure_root_component(&mut self) {
        if self.components.is_empty() {
            self.components.push(ComponentDescriptor::root());
        }
    }

    /// Total planned component count
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// Architectural shape of the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    /// Style name (e.g. "layered", "component-based")
    pub style: String,
    /// Layer names, outermost first
    pub layers: Vec<String>,
    /// Architectural patterns in play
    pub patterns: Vec<String>,
    /// Analyzer confidence in [0.0, 1.0]; 0.0 marks a default
    pub confidence: f64,
}

impl ArchitectureSpec {
    /// Neutral default: layered, no patterns, zero confidence
    #[must_use]
    pub fn layered() -> Self {
        Self {
            style: "layered".to_string(),
            layers: vec![
                "presentation".to_string(),
                "business".to_string(),
                "data".to_string(),
            ],
            patterns: Vec::new(),
            confidence: 0.0,
        }
    }

    /// Architecture inferred from example code
    #[must_use]
    pub fn example_derived(patterns: Vec<String>) -> Self {
        Self {
            style: "component-based".to_string(),
            layers: vec!["components".to_string(), "services".to_string()],
            patterns,
            confidence: 0.5,
        }
    }

    /// Whether the analyzer actually committed to this shape
    #[inline]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.confidence == 0.0
    }
}

impl Default for ArchitectureSpec {
    fn default() -> Self {
        Self::layered()
    }
}

/// A planned component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Component name (e.g. "LoginForm")
    pub name: String,
    /// Component kind
    pub kind: ComponentKind,
    /// What the component is for
    pub description: String,
    /// Responsibilities assigned to it
    pub responsibilities: Vec<String>,
    /// Names of components it depends on
    pub dependencies: Vec<String>,
}

impl ComponentDescriptor {
    /// New descriptor with empty responsibilities and dependencies
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            responsibilities: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With responsibilities
    #[inline]
    #[must_use]
    pub fn with_responsibilities(mut self, responsibilities: Vec<String>) -> Self {
        self.responsibilities = responsibilities;
        self
    }

    /// With dependencies
    #[inline]
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Root application component, always a valid plan on its own
    #[must_use]
    pub fn root() -> Self {
        Self::new("App", ComponentKind::Page)
            .with_description("Application root")
            .with_responsibilities(vec!["render application shell".to_string()])
    }
}

/// Component kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Routed page
    Page,
    /// Reusable UI component
    Component,
    /// Layout wrapper
    Layout,
    /// Service / API access
    Service,
    /// Data model
    Model,
    /// Utility module
    Utility,
}

impl ComponentKind {
    /// Directory the generated file lands in
    #[inline]
    #[must_use]
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Page => "pages",
            Self::Component => "components",
            Self::Layout => "layouts",
            Self::Service => "services",
            Self::Model => "models",
            Self::Utility => "utils",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Page => "page",
            Self::Component => "component",
            Self::Layout => "layout",
            Self::Service => "service",
            Self::Model => "model",
            Self::Utility => "utility",
        };
        f.write_str(name)
    }
}

/// A data entity of the application domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEntity {
    /// Entity name (e.g. "Order")
    pub name: String,
    /// Fields of the entity
    pub fields: Vec<EntityField>,
    /// Names of related entities
    pub relations: Vec<String>,
}

impl DataEntity {
    /// New entity with no fields or relations
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// With a field appended
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: EntityField) -> Self {
        self.fields.push(field);
        self
    }
}

/// One field of a data entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityField {
    /// Field name
    pub name: String,
    /// Declared type (target-language syntax)
    pub field_type: String,
    /// Whether the field is required
    pub required: bool,
}

impl EntityField {
    /// Required field
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: true,
        }
    }

    /// Optional field
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
        }
    }
}

/// Technology stack of the generated application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyStack {
    /// Target language
    pub language: String,
    /// Target framework, when chosen
    pub framework: Option<String>,
    /// Libraries to depend on
    pub libraries: Vec<String>,
    /// Build tool, when chosen
    pub build_tool: Option<String>,
}

impl TechnologyStack {
    /// Stack with only the language pinned
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            framework: None,
            libraries: Vec::new(),
            build_tool: None,
        }
    }

    /// With framework
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// With libraries
    #[inline]
    #[must_use]
    pub fn with_libraries(mut self, libraries: Vec<String>) -> Self {
        self.libraries = libraries;
        self
    }
}

/// Quality policy the synthesizer and scorer honor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityPolicy {
    /// Testing strategy
    pub testing: TestingStrategy,
    /// Enforce accessibility conventions in generated markup
    pub accessibility: bool,
    /// Enforce idiomatic code style
    pub idiomatic_style: bool,
    /// Security requirements to surface in synthesis prompts
    #[serde(default)]
    pub security_targets: Vec<String>,
    /// Performance requirements to surface in synthesis prompts
    #[serde(default)]
    pub performance_targets: Vec<String>,
}

impl QualityPolicy {
    /// Standard policy: tests on, accessibility on, idiomatic style on
    #[must_use]
    pub fn standard() -> Self {
        Self {
            testing: TestingStrategy::default(),
            accessibility: true,
            idiomatic_style: true,
            security_targets: Vec::new(),
            performance_targets: Vec::new(),
        }
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// How tests are to be generated for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingStrategy {
    /// Generate a companion test for each component
    pub generate_tests: bool,
    /// Test framework, when chosen
    pub framework: Option<String>,
    /// Target coverage percentage
    pub coverage_target: u8,
}

impl Default for TestingStrategy {
    fn default() -> Self {
        Self {
            generate_tests: true,
            framework: None,
            coverage_target: 80,
        }
    }
}
