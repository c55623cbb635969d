//! Project packaging renderers
//!
//! Deterministic text artifacts assembled from the specification and the
//! synthesized batch: a package manifest and a readme. Rendering never
//! calls a capability, so identical inputs always produce identical bytes.

use forge_spec::{GeneratedComponent, TechnicalSpecification};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Serialize)]
struct PackageManifest<'a> {
    name: String,
    version: &'static str,
    description: &'a str,
    private: bool,
    dependencies: IndexMap<&'a str, &'a str>,
    #[serde(rename = "devDependencies", skip_serializing_if = "IndexMap::is_empty")]
    dev_dependencies: IndexMap<&'a str, &'a str>,
}

/// Render the package manifest for a synthesized batch
///
/// Dependencies aggregate the declared stack first, then imports observed
/// in the generated sources, first seen wins.
pub(crate) fn render_manifest(
    specification: &TechnicalSpecification,
    components: &[GeneratedComponent],
) -> String {
    let mut dependencies: IndexMap<&str, &str> = IndexMap::new();
    if let Some(framework) = &specification.stack.framework {
        dependencies.insert(framework, "latest");
    }
    for library in &specification.stack.libraries {
        dependencies.entry(library).or_insert("latest");
    }
    for component in components {
        for package in &component.dependencies {
            dependencies.entry(package).or_insert("latest");
        }
    }

    let mut dev_dependencies: IndexMap<&str, &str> = IndexMap::new();
    if components.iter().any(GeneratedComponent::has_test) {
        if let Some(runner) = test_runner(specification) {
            dev_dependencies.insert(runner, "latest");
        }
    }

    let manifest = PackageManifest {
        name: slug(&specification.name),
        version: "0.1.0",
        description: &specification.description,
        private: true,
        dependencies,
        dev_dependencies,
    };
    serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| "{}".to_string())
}

fn test_runner(specification: &TechnicalSpecification) -> Option<&str> {
    if let Some(framework) = &specification.quality.testing.framework {
        return Some(framework);
    }
    match specification.stack.language.as_str() {
        "typescript" | "javascript" => Some("jest"),
        "python" => Some("pytest"),
        _ => None,
    }
}

/// Render the project readme
pub(crate) fn render_readme(
    specification: &TechnicalSpecification,
    components: &[GeneratedComponent],
) -> String {
    let mut readme = format!("# {}\n\n", specification.name);
    if !specification.description.is_empty() {
        readme.push_str(&format!("{}\n\n", specification.description));
    }

    if !specification.features.is_empty() {
        readme.push_str("## Features\n\n");
        for feature in &specification.features {
            readme.push_str(&format!("- {feature}\n"));
        }
        readme.push('\n');
    }

    readme.push_str("## Architecture\n\n");
    readme.push_str(&format!(
        "{} architecture",
        capitalize(&specification.architecture.style)
    ));
    if !specification.architecture.layers.is_empty() {
        readme.push_str(&format!(
            " with {} layers",
            specification.architecture.layers.join(", ")
        ));
    }
    readme.push_str(".\n");
    if !specification.architecture.patterns.is_empty() {
        readme.push_str(&format!(
            "Patterns: {}.\n",
            specification.architecture.patterns.join(", ")
        ));
    }
    readme.push('\n');

    if !components.is_empty() {
        readme.push_str("## Components\n\n");
        for component in components {
            readme.push_str(&format!(
                "- `{}` ({})\n",
                component.file_path, component.kind
            ));
        }
        readme.push('\n');
    }

    readme.push_str("## Stack\n\n");
    readme.push_str(&format!("- Language: {}\n", specification.stack.language));
    if let Some(framework) = &specification.stack.framework {
        readme.push_str(&format!("- Framework: {framework}\n"));
    }
    readme
}

/// Package-name slug: lowercase alphanumerics joined by single dashes
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "generated-app".to_string()
    } else {
        out
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_spec::ComponentKind;
    use pretty_assertions::assert_eq;

    fn sample_specification() -> TechnicalSpecification {
        let mut specification = TechnicalSpecification::minimal("Task Tracker", "typescript");
        specification.description = "Track tasks across projects".to_string();
        specification.features = vec!["task lists".to_string(), "due dates".to_string()];
        specification.stack = specification.stack.with_framework("react");
        specification
    }

    fn sample_components() -> Vec<GeneratedComponent> {
        vec![
            GeneratedComponent::new(
                "TaskList",
                ComponentKind::Component,
                "src/components/TaskList.tsx",
                "import React from 'react';\n",
            )
            .with_dependencies(vec!["react".to_string(), "date-fns".to_string()])
            .with_test_source("test('renders', () => {});\n"),
            GeneratedComponent::new(
                "TaskService",
                ComponentKind::Service,
                "src/services/TaskService.ts",
                "export const fetchTasks = () => [];\n",
            )
            .with_dependencies(vec!["axios".to_string()]),
        ]
    }

    #[test]
    fn manifest_orders_stack_before_imports() {
        let manifest = render_manifest(&sample_specification(), &sample_components());
        let parsed: serde_json::Value = serde_json::from_str(&manifest).unwrap();

        assert_eq!(parsed["name"], "task-tracker");
        assert_eq!(parsed["version"], "0.1.0");
        assert_eq!(parsed["dependencies"].as_object().unwrap().len(), 3);
        assert_eq!(parsed["devDependencies"]["jest"], "latest");

        // Rendered order: declared stack first, then observed imports
        let react = manifest.find("\"react\"").unwrap();
        let date_fns = manifest.find("\"date-fns\"").unwrap();
        let axios = manifest.find("\"axios\"").unwrap();
        assert!(react < date_fns);
        assert!(date_fns < axios);
    }

    #[test]
    fn manifest_is_deterministic() {
        let first = render_manifest(&sample_specification(), &sample_components());
        let second = render_manifest(&sample_specification(), &sample_components());
        assert_eq!(first, second);
    }

    #[test]
    fn manifest_without_tests_skips_dev_dependencies() {
        let mut components = sample_components();
        for component in &mut components {
            component.test_source = None;
        }
        let manifest = render_manifest(&sample_specification(), &components);
        let parsed: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert!(parsed.get("devDependencies").is_none());
    }

    #[test]
    fn readme_lists_sections_in_order() {
        let readme = render_readme(&sample_specification(), &sample_components());

        let features = readme.find("## Features").unwrap();
        let architecture = readme.find("## Architecture").unwrap();
        let components = readme.find("## Components").unwrap();
        let stack = readme.find("## Stack").unwrap();
        assert!(features < architecture);
        assert!(architecture < components);
        assert!(components < stack);

        assert!(readme.starts_with("# Task Tracker\n"));
        assert!(readme.contains("- task lists\n"));
        assert!(readme.contains("Layered architecture with presentation, business, data layers."));
        assert!(readme.contains("- `src/components/TaskList.tsx` (component)\n"));
        assert!(readme.contains("- Framework: react\n"));
    }

    #[test]
    fn readme_omits_empty_sections() {
        let specification = TechnicalSpecification::minimal("bare", "rust");
        let readme = render_readme(&specification, &[]);
        assert!(!readme.contains("## Features"));
        assert!(!readme.contains("## Components"));
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slug("Task Tracker"), "task-tracker");
        assert_eq!(slug("  My--App!  "), "my-app");
        assert_eq!(slug("???"), "generated-app");
    }
}
