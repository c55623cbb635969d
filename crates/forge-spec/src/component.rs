//! Generated components
//!
//! Output units of synthesis: one source file per planned component,
//! optionally paired with a test file, plus measured metadata.

use crate::specification::ComponentKind;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique component identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub Ulid);

impl ComponentId {
    /// Generate new component ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ComponentId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

/// One synthesized source component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedComponent {
    /// Component identity
    pub id: ComponentId,
    /// Component name (e.g. "LoginForm")
    pub name: String,
    /// Component kind
    pub kind: ComponentKind,
    /// Project-relative file path (e.g. "src/components/LoginForm.tsx")
    pub file_path: String,
    /// Source content
    pub source: String,
    /// Companion test content, when generated
    pub test_source: Option<String>,
    /// Module names this component imports
    pub dependencies: Vec<String>,
    /// Measured metadata
    pub metadata: ComponentMetadata,
}

impl GeneratedComponent {
    /// New component with empty metadata
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: ComponentKind,
        file_path: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: ComponentId::new(),
            name: name.into(),
            kind,
            file_path: file_path.into(),
            source: source.into(),
            test_source: None,
            dependencies: Vec::new(),
            metadata: ComponentMetadata::default(),
        }
    }

    /// With companion test content
    #[inline]
    #[must_use]
    pub fn with_test_source(mut self, test_source: impl Into<String>) -> Self {
        self.test_source = Some(test_source.into());
        self
    }

    /// With imported module names
    #[inline]
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// With measured metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: ComponentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether a companion test was generated
    #[inline]
    #[must_use]
    pub fn has_test(&self) -> bool {
        self.test_source.is_some()
    }
}

/// Metadata measured from a generated source file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Source line count
    pub line_count: usize,
    /// Cyclomatic complexity estimate (1 = straight-line)
    pub complexity: u32,
    /// Estimated test coverage percentage in [0.0, 100.0]
    pub coverage_estimate: f64,
}

impl ComponentMetadata {
    /// New metadata record
    #[inline]
    #[must_use]
    pub fn new(line_count: usize, complexity: u32, coverage_estimate: f64) -> Self {
        Self {
            line_count,
            complexity,
            coverage_estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_roundtrip() {
        let id = ComponentId::new();
        let parsed: ComponentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn component_builder() {
        let component = GeneratedComponent::new(
            "LoginForm",
            ComponentKind::Component,
            "src/components/LoginForm.tsx",
            "export const LoginForm = () => null;\n",
        )
        .with_test_source("test('renders', () => {});\n")
        .with_dependencies(vec!["react".to_string()]);

        assert!(component.has_test());
        assert_eq!(component.dependencies.len(), 1);
        assert_eq!(component.kind, ComponentKind::Component);
    }

    #[test]
    fn default_metadata_is_zeroed() {
        let metadata = ComponentMetadata::default();
        assert_eq!(metadata.line_count, 0);
        assert_eq!(metadata.complexity, 0);
        assert_eq!(metadata.coverage_estimate, 0.0);
    }
}
