//! Source measurement heuristics
//!
//! Language-agnostic estimates over generated text: line counts, branch
//! counting for complexity, import extraction, and a coarse coverage
//! estimate. These are text heuristics, not parsers; they only need to be
//! stable and monotonic for scoring.

use forge_spec::ComponentMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

static BRANCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|for|while|case|catch)\b").expect("branch pattern compiles"));

// A ternary `?` sits between whitespace; `?.` and `??` do not match.
static TERNARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\?\s").expect("ternary pattern compiles"));

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^\s*import\s+(?:[^'"]*?\s+from\s+)?['"]([^'"]+)['"]|require\(\s*['"]([^'"]+)['"]\s*\)"#,
    )
    .expect("import pattern compiles")
});

static PY_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:from\s+([A-Za-z_][\w.]*)\s+import\b|import\s+([A-Za-z_][\w.]*))")
        .expect("python import pattern compiles")
});

static RUST_USE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:pub\s+)?use\s+([A-Za-z_]\w*)").expect("use pattern compiles")
});

/// Measure one generated component
pub(crate) fn measure(source: &str, test_source: Option<&str>) -> ComponentMetadata {
    ComponentMetadata::new(
        line_count(source),
        complexity(source),
        coverage_estimate(source, test_source),
    )
}

/// Number of source lines: newline count plus one
///
/// An empty source still occupies one line; a trailing newline opens
/// another.
pub(crate) fn line_count(source: &str) -> usize {
    source.matches('\n').count() + 1
}

/// Branch-count complexity estimate, minimum 1
///
/// One point per branching keyword, per boolean connective, and per
/// ternary. Straight-line code scores exactly 1.
pub(crate) fn complexity(source: &str) -> u32 {
    let branches = BRANCH_RE
        .find_iter(source)
        .count()
        .saturating_add(source.matches("&&").count())
        .saturating_add(source.matches("||").count())
        .saturating_add(TERNARY_RE.find_iter(source).count());
    u32::try_from(branches.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Coarse coverage estimate in [0.0, 100.0]
///
/// No tests means zero. With tests, the test-to-source line ratio is
/// scaled to a percentage and clamped to [25, 90] so a token test never
/// scores zero and no estimate pretends to be exhaustive.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn coverage_estimate(source: &str, test_source: Option<&str>) -> f64 {
    let Some(tests) = test_source else {
        return 0.0;
    };
    if tests.trim().is_empty() {
        return 0.0;
    }
    let ratio = line_count(tests) as f64 / line_count(source) as f64;
    (ratio * 100.0).round().clamp(25.0, 90.0)
}

/// External package names imported by the source, in first-seen order
///
/// Relative and absolute paths are skipped; scoped packages keep their
/// scope, deep imports collapse to the package root. Python and Rust
/// sources use their own import syntax; everything else is read as
/// JavaScript-family `import`/`require`.
pub(crate) fn extract_imports(source: &str, language: &str) -> Vec<String> {
    let mut packages = Vec::new();
    match language {
        "python" => {
            for captures in PY_IMPORT_RE.captures_iter(source) {
                let Some(raw) = captures.get(1).or_else(|| captures.get(2)) else {
                    continue;
                };
                let root = raw.as_str().split('.').next().unwrap_or_default();
                push_unique(&mut packages, root);
            }
        }
        "rust" => {
            for captures in RUST_USE_RE.captures_iter(source) {
                let Some(root) = captures.get(1) else {
                    continue;
                };
                if matches!(
                    root.as_str(),
                    "crate" | "self" | "super" | "std" | "core" | "alloc"
                ) {
                    continue;
                }
                push_unique(&mut packages, root.as_str());
            }
        }
        _ => {
            for captures in IMPORT_RE.captures_iter(source) {
                let Some(raw) = captures.get(1).or_else(|| captures.get(2)) else {
                    continue;
                };
                let Some(package) = package_root(raw.as_str()) else {
                    continue;
                };
                push_unique(&mut packages, &package);
            }
        }
    }
    packages
}

fn push_unique(packages: &mut Vec<String>, package: &str) {
    if !package.is_empty() && !packages.iter().any(|seen| seen == package) {
        packages.push(package.to_string());
    }
}

fn package_root(name: &str) -> Option<String> {
    if name.starts_with('.') || name.starts_with('/') {
        return None;
    }
    let mut parts = name.split('/');
    let first = parts.next()?;
    if first.is_empty() {
        return None;
    }
    if first.starts_with('@') {
        let second = parts.next()?;
        Some(format!("{first}/{second}"))
    } else {
        Some(first.to_string())
    }
}
