//! Generation orchestrator
//!
//! Drives one request through the full pipeline: admission and the cache
//! gate, specification analysis, architecture enhancement, component
//! synthesis, validation, scoring, and assembly. Stage transitions run
//! through the request state machine. Capability failures downgrade to
//! stage fallbacks; only missing input, internal faults, and cancellation
//! abort a request.

use crate::analyze::SpecificationAnalyzer;
use crate::config::OrchestratorConfig;
use crate::enhance::ArchitectureEnhancer;
use crate::error::GenerationError;
use crate::normalize::{self, Admission, RequestGate};
use crate::packaging;
use crate::recorder::FeedbackRecorder;
use crate::scoring::{self, ResultValidator};
use crate::state::{RequestState, StateTracker};
use crate::synthesize::{ComponentSynthesizer, SynthesisOutcome};
use forge_capability::{CapabilitySet, LearningCapability};
use forge_spec::{
    Fingerprint, GeneratedComponent, GenerationMetrics, GenerationRequest, GenerationResult,
    HistoryRecord, TechnicalSpecification, ValidationReport,
};
use forge_store::{HistoryStore, ResultStore};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// The generation pipeline entry point
///
/// One instance serves many concurrent requests; all shared state lives
/// in the injected stores.
pub struct GenerationOrchestrator {
    gate: RequestGate,
    analyzer: SpecificationAnalyzer,
    enhancer: ArchitectureEnhancer,
    synthesizer: ComponentSynthesizer,
    validator: ResultValidator,
    recorder: FeedbackRecorder,
    history: Arc<dyn HistoryStore>,
}

impl GenerationOrchestrator {
    /// Assemble the pipeline from capabilities and stores
    #[must_use]
    pub fn new(
        config: OrchestratorConfig,
        capabilities: CapabilitySet,
        learning: Arc<dyn LearningCapability>,
        results: Arc<dyn ResultStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let timeout = config.capability_timeout();
        Self {
            gate: RequestGate::new(results),
            analyzer: SpecificationAnalyzer::new(capabilities.analysis, timeout),
            enhancer: ArchitectureEnhancer::new(capabilities.architecture, timeout),
            synthesizer: ComponentSynthesizer::new(
                capabilities.generation,
                timeout,
                config.max_concurrent_synthesis,
            ),
            validator: ResultValidator::new(capabilities.validation, timeout),
            recorder: FeedbackRecorder::new(learning),
            history,
        }
    }

    /// The history store this pipeline appends to
    #[must_use]
    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Run a request through the pipeline to a terminal state
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Validation`] when mode-required input is
    /// missing, [`GenerationError::System`] on internal faults. Capability
    /// failures never surface here; they degrade the result instead.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.generate_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Run with a caller-held cancellation token
    ///
    /// Cancellation is observed at stage boundaries and before each
    /// synthesis call: work in flight finishes, nothing new starts, and
    /// the request fails with [`GenerationError::Cancelled`].
    ///
    /// # Errors
    ///
    /// As [`GenerationOrchestrator::generate`], plus
    /// [`GenerationError::Cancelled`].
    pub async fn generate_with_cancellation(
        &self,
        mut request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<GenerationResult, GenerationError> {
        let started = Instant::now();
        normalize::normalize_request(&mut request);
        tracing::info!("generation {} started ({} mode)", request.id, request.mode());

        match self.run(&request, &cancel, started).await {
            Ok(result) => Ok(result),
            Err(err) => {
                let duration_ms = elapsed_ms(started);
                tracing::warn!(
                    "generation {} failed after {duration_ms}ms: {err}",
                    request.id
                );
                let record = HistoryRecord::failed(
                    &request,
                    Fingerprint::of_request(&request),
                    err.code().as_str(),
                    err.to_string(),
                    duration_ms,
                );
                self.append_history(record).await;
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        started: Instant,
    ) -> Result<GenerationResult, GenerationError> {
        let mut tracker = StateTracker::new();

        let fingerprint = match self.gate.admit(request).await? {
            Admission::CacheHit(result) => {
                tracker.advance(RequestState::CacheHit)?;
                tracker.advance(RequestState::Completed)?;
                tracing::info!(
                    "generation {} served from cache in {}ms",
                    request.id,
                    elapsed_ms(started)
                );
                return Ok(*result);
            }
            Admission::Proceed(fingerprint) => fingerprint,
        };

        ensure_live(cancel)?;
        let analyzed = self.analyzer.analyze(request).await?;
        tracker.advance(RequestState::Analyzed)?;
        let mut specification = analyzed.specification;
        let context = analyzed.context;
        let mut degraded = analyzed.degraded;

        ensure_live(cancel)?;
        degraded |= self
            .enhancer
            .enhance(request, &mut specification, &context)
            .await;
        tracker.advance(RequestState::Enhanced)?;

        ensure_live(cancel)?;
        tracker.advance(RequestState::Synthesizing)?;
        let outcomes = self
            .synthesizer
            .synthesize_all(request, &specification, &context, cancel)
            .await;
        let planned = outcomes.len();
        let mut components = Vec::with_capacity(planned);
        for outcome in outcomes {
            if let SynthesisOutcome::Success(component) = outcome {
                components.push(*component);
            }
        }
        if components.is_empty() {
            tracing::warn!("no components synthesized for generation {}", request.id);
        } else if components.len() < planned {
            tracing::warn!(
                "synthesized {} of {} planned components",
                components.len(),
                planned
            );
        }

        ensure_live(cancel)?;
        let (validation, validation_degraded) =
            self.validator.validate(request, &components).await;
        degraded |= validation_degraded;
        tracker.advance(RequestState::Validated)?;

        let quality_score =
            scoring::quality_score(validation.score, scoring::average_complexity(&components));
        tracker.advance(RequestState::Scored)?;

        let result = assemble(
            request,
            &specification,
            components,
            validation,
            quality_score,
            degraded,
            started,
        );
        tracker.advance(RequestState::Completed)?;

        if request.options.use_cache {
            self.gate.store(fingerprint, &result).await;
        }
        let record = HistoryRecord::completed(
            request,
            fingerprint,
            &result,
            result.metrics.generation_time_ms,
        );
        self.append_history(record).await;
        self.recorder.record_completion(request, &result);

        tracing::info!(
            "generation {} completed: {} components, quality {:.1}, {}ms",
            request.id,
            result.metrics.total_components,
            result.quality_score,
            result.metrics.generation_time_ms
        );
        Ok(result)
    }

    /// History faults are logged and swallowed; the outcome stands
    async fn append_history(&self, record: HistoryRecord) {
        if let Err(err) = self.history.append(record).await {
            tracing::warn!("history append failed: {err}");
        }
    }
}

fn assemble(
    request: &GenerationRequest,
    specification: &TechnicalSpecification,
    components: Vec<GeneratedComponent>,
    validation: ValidationReport,
    quality_score: f64,
    degraded: bool,
    started: Instant,
) -> GenerationResult {
    let total_components = components.len();
    let total_lines = components
        .iter()
        .map(|component| component.metadata.line_count)
        .sum();
    let tests_generated = components
        .iter()
        .filter(|component| component.has_test())
        .count();
    let package_manifest = packaging::render_manifest(specification, &components);
    let readme = packaging::render_readme(specification, &components);
    let validated = validation.is_clean();

    GenerationResult {
        request_id: request.id,
        project_id: request.project_id.clone(),
        components,
        architecture: specification.architecture.clone(),
        package_manifest,
        readme,
        quality_score,
        validated,
        degraded,
        validation,
        metrics: GenerationMetrics {
            total_components,
            total_lines,
            generation_time_ms: elapsed_ms(started),
            tests_generated,
        },
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), GenerationError> {
    if cancel.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
