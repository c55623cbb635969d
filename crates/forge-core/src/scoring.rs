//! Validation and quality scoring
//!
//! Validation consults the external capability when the request asks for
//! it; a failed capability degrades to a fixed conservative report instead
//! of failing the request. Scoring itself is pure arithmetic over the
//! validation verdict and measured complexity.

use crate::synthesize::test_path;
use forge_capability::{call_with_timeout, SourceFile, ValidationCapability};
use forge_spec::{GeneratedComponent, GenerationRequest, ValidationReport};
use std::sync::Arc;
use std::time::Duration;

/// Runs the validation stage over synthesized components
pub(crate) struct ResultValidator {
    validation: Arc<dyn ValidationCapability>,
    timeout: Duration,
}

impl ResultValidator {
    pub(crate) fn new(validation: Arc<dyn ValidationCapability>, timeout: Duration) -> Self {
        Self {
            validation,
            timeout,
        }
    }

    /// Produce the validation report for a synthesized batch
    ///
    /// Returns the report plus whether the stage degraded. Disabled
    /// validation is optimistic, not degraded; an empty batch skips the
    /// capability entirely.
    pub(crate) async fn validate(
        &self,
        request: &GenerationRequest,
        components: &[GeneratedComponent],
    ) -> (ValidationReport, bool) {
        if !request.options.validate {
            tracing::debug!("validation disabled by request");
            return (ValidationReport::optimistic(), false);
        }
        if components.is_empty() {
            return (
                ValidationReport {
                    performed: false,
                    score: 0.0,
                    errors: Vec::new(),
                    warnings: vec!["no components synthesized".to_string()],
                },
                false,
            );
        }

        let files = collect_files(components);
        match call_with_timeout(self.timeout, self.validation.validate(&files)).await {
            Ok(outcome) => {
                tracing::debug!(
                    "validation scored {:.1} with {} errors",
                    outcome.score,
                    outcome.errors.len()
                );
                (
                    ValidationReport::from_outcome(outcome.score, outcome.errors, outcome.warnings),
                    false,
                )
            }
            Err(err) => {
                tracing::warn!("validation capability failed, degrading: {err}");
                (ValidationReport::degraded(err), true)
            }
        }
    }
}

/// Flatten components into the file list sent to the validator
fn collect_files(components: &[GeneratedComponent]) -> Vec<SourceFile> {
    let mut files = Vec::with_capacity(components.len() * 2);
    for component in components {
        files.push(SourceFile::new(&component.file_path, &component.source));
        if let Some(tests) = &component.test_source {
            files.push(SourceFile::new(test_path(&component.file_path), tests));
        }
    }
    files
}

/// Composite quality score in [0.0, 100.0]
///
/// Weighted blend: 70% validator compliance, 30% structural simplicity.
#[must_use]
pub(crate) fn quality_score(compliance: f64, average_complexity: f64) -> f64 {
    (0.7 * compliance + 0.3 * inverse_complexity(average_complexity)).clamp(0.0, 100.0)
}

/// Map average branch complexity onto a [0.0, 100.0] simplicity scale
///
/// Straight-line code (complexity 1) scores 100; anything at or beyond an
/// average of 21 branches per component scores 0.
#[must_use]
pub(crate) fn inverse_complexity(average: f64) -> f64 {
    ((21.0 - average) / 20.0).clamp(0.0, 1.0) * 100.0
}

/// Mean component complexity; an empty batch counts as straight-line
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn average_complexity(components: &[GeneratedComponent]) -> f64 {
    if components.is_empty() {
        return 1.0;
    }
    let total: u64 = components
        .iter()
        .map(|component| u64::from(component.metadata.complexity))
        .sum();
    total as f64 / components.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_capability::{CapabilityError, ValidationOutcome};
    use forge_spec::{
        ComponentKind, ComponentMetadata, GenerationInput, RequestOptions,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CleanValidator;

    #[async_trait::async_trait]
    impl ValidationCapability for CleanValidator {
        async fn validate(
            &self,
            _files: &[SourceFile],
        ) -> Result<ValidationOutcome, CapabilityError> {
            Ok(ValidationOutcome::clean())
        }
    }

    struct HarshValidator;

    #[async_trait::async_trait]
    impl ValidationCapability for HarshValidator {
        async fn validate(
            &self,
            files: &[SourceFile],
        ) -> Result<ValidationOutcome, CapabilityError> {
            Ok(ValidationOutcome {
                score: 62.5,
                errors: vec![format!("{} files, first is {}", files.len(), files[0].path)],
                warnings: vec!["prefer const".to_string()],
            })
        }
    }

    struct OfflineValidator;

    #[async_trait::async_trait]
    impl ValidationCapability for OfflineValidator {
        async fn validate(
            &self,
            _files: &[SourceFile],
        ) -> Result<ValidationOutcome, CapabilityError> {
            Err(CapabilityError::unavailable("linter offline"))
        }
    }

    struct CountingValidator {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ValidationCapability for CountingValidator {
        async fn validate(
            &self,
            _files: &[SourceFile],
        ) -> Result<ValidationOutcome, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ValidationOutcome::clean())
        }
    }

    fn component(name: &str, complexity: u32) -> GeneratedComponent {
        GeneratedComponent::new(
            name,
            ComponentKind::Component,
            format!("src/components/{name}.tsx"),
            "export const X = () => null;\n",
        )
        .with_test_source("test('x', () => {});\n")
        .with_metadata(ComponentMetadata::new(1, complexity, 25.0))
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(GenerationInput::Prompt("Create".to_string()), "typescript")
    }

    fn validator(capability: Arc<dyn ValidationCapability>) -> ResultValidator {
        ResultValidator::new(capability, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn clean_batch_is_performed_and_clean() {
        let (report, degraded) = validator(Arc::new(CleanValidator))
            .validate(&request(), &[component("A", 1)])
            .await;
        assert!(!degraded);
        assert!(report.performed);
        assert!(report.is_clean());
        assert_eq!(report.score, 100.0);
    }

    #[tokio::test]
    async fn capability_outcome_passes_through() {
        let (report, degraded) = validator(Arc::new(HarshValidator))
            .validate(&request(), &[component("A", 1)])
            .await;
        assert!(!degraded);
        assert!(report.performed);
        assert_eq!(report.score, 62.5);
        // Source file plus its companion test
        assert_eq!(report.errors, vec!["2 files, first is src/components/A.tsx"]);
    }

    #[tokio::test]
    async fn offline_capability_degrades() {
        let (report, degraded) = validator(Arc::new(OfflineValidator))
            .validate(&request(), &[component("A", 1)])
            .await;
        assert!(degraded);
        assert!(!report.performed);
        assert_eq!(report.score, 50.0);
        assert_eq!(
            report.errors,
            vec!["validation unavailable: capability unavailable: linter offline"]
        );
    }

    #[tokio::test]
    async fn disabled_validation_never_calls_capability() {
        let counting = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
        });
        let request = request().with_options(RequestOptions::new().with_validation(false));
        let (report, degraded) = validator(counting.clone())
            .validate(&request, &[component("A", 1)])
            .await;
        assert!(!degraded);
        assert!(!report.performed);
        assert_eq!(report.score, 100.0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_batch_skips_capability() {
        let counting = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
        });
        let (report, degraded) = validator(counting.clone()).validate(&request(), &[]).await;
        assert!(!degraded);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.warnings, vec!["no components synthesized"]);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn quality_blends_compliance_and_simplicity() {
        assert_eq!(quality_score(100.0, 1.0), 100.0);
        assert_eq!(quality_score(100.0, 21.0), 70.0);
        assert_eq!(quality_score(100.0, 11.0), 85.0);
        assert_eq!(quality_score(0.0, 21.0), 0.0);
        assert_eq!(quality_score(50.0, 1.0), 65.0);
    }

    #[test]
    fn inverse_complexity_clamps_both_ends() {
        assert_eq!(inverse_complexity(0.0), 100.0);
        assert_eq!(inverse_complexity(1.0), 100.0);
        assert_eq!(inverse_complexity(40.0), 0.0);
    }

    #[test]
    fn average_complexity_of_empty_batch_is_one() {
        assert_eq!(average_complexity(&[]), 1.0);
        let batch = vec![component("A", 3), component("B", 5)];
        assert_eq!(average_complexity(&batch), 4.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn quality_score_stays_in_band(
                compliance in 0.0f64..=100.0,
                average in 0.0f64..=1000.0,
            ) {
                let score = quality_score(compliance, average);
                prop_assert!((0.0..=100.0).contains(&score));
            }

            #[test]
            fn simpler_code_never_scores_lower(
                compliance in 0.0f64..=100.0,
                average in 1.0f64..=100.0,
                delta in 0.0f64..=10.0,
            ) {
                let simpler = quality_score(compliance, average);
                let busier = quality_score(compliance, average + delta);
                prop_assert!(simpler >= busier);
            }
        }
    }
}
