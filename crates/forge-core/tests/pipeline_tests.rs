//! End-to-end pipeline tests over in-memory stores and capability fakes

use forge_capability::{
    AnalysisCapability, AnalysisOutcome, AnalysisRequest, CapabilityError, CapabilitySet,
    CodeGenRequest, CodeGenerationCapability,
};
use forge_core::{GenerationError, GenerationOrchestrator, OrchestratorConfig};
use forge_spec::{
    BlueprintRef, ComponentKind, Fingerprint, GenerationInput, GenerationRequest, GenerationResult,
    HistoryRecord, RequestOptions, RequestStatus,
};
use forge_store::{HistoryStore, MemoryHistoryStore, MemoryResultStore, ResultStore, StoreError};
use forge_test_utils::{
    init_tracing, prompt_request, sample_specification, setup_pipeline, setup_pipeline_with,
    template_source, CountingGenerator, FailingGenerator, RecordingLearning, StaticAnalysis,
    StaticArchitecture, StaticValidator, TemplateGenerator, UnavailableAnalysis,
    UnavailableValidator,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Analysis fake that counts calls before delegating to a fixed plan
struct CountingAnalysis {
    calls: AtomicUsize,
    inner: StaticAnalysis,
}

impl CountingAnalysis {
    fn new(names: &[&str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: StaticAnalysis::planning(names),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalysisCapability for CountingAnalysis {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.analyze(request).await
    }
}

/// Generation fake that trips the shared token on its first call
struct CancellingGenerator {
    cancel: CancellationToken,
    calls: AtomicUsize,
}

impl CancellingGenerator {
    fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CodeGenerationCapability for CancellingGenerator {
    async fn generate(&self, request: &CodeGenRequest) -> Result<String, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cancel.cancel();
        Ok(template_source(&request.prompt))
    }
}

/// Result store whose every operation fails
struct FaultyResultStore;

#[async_trait::async_trait]
impl ResultStore for FaultyResultStore {
    async fn get(
        &self,
        _fingerprint: &Fingerprint,
    ) -> Result<Option<GenerationResult>, StoreError> {
        Err(store_offline())
    }

    async fn put(
        &self,
        _fingerprint: Fingerprint,
        _result: GenerationResult,
    ) -> Result<(), StoreError> {
        Err(store_offline())
    }

    async fn invalidate(&self, _fingerprint: &Fingerprint) -> Result<(), StoreError> {
        Err(store_offline())
    }
}

/// History store whose every operation fails
struct FaultyHistoryStore;

#[async_trait::async_trait]
impl HistoryStore for FaultyHistoryStore {
    async fn append(&self, _record: HistoryRecord) -> Result<(), StoreError> {
        Err(store_offline())
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        Err(store_offline())
    }

    async fn for_project(&self, _project_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        Err(store_offline())
    }
}

fn store_offline() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "store offline",
    ))
}

#[tokio::test]
async fn prompt_request_completes_with_components() {
    init_tracing();
    let pipeline = setup_pipeline();
    let request = prompt_request("Create a task tracker");

    let result = pipeline.orchestrator.generate(request.clone()).await.unwrap();

    assert_eq!(result.components.len(), 2);
    for component in &result.components {
        assert!(!component.source.trim().is_empty());
        assert!(component.has_test());
    }
    assert_eq!(result.components[0].file_path, "src/components/App.tsx");
    assert_eq!(result.components[1].file_path, "src/components/TaskList.tsx");

    assert!(result.validated);
    assert!(!result.degraded);
    assert_eq!(result.quality_score, 100.0);
    // Proposal wins over the silent minimal analysis
    assert_eq!(result.architecture.style, "component-based");

    assert_eq!(result.metrics.total_components, 2);
    assert_eq!(result.metrics.tests_generated, 2);
    assert!(result.metrics.total_lines > 0);

    assert!(!result.package_manifest.is_empty());
    assert!(result.readme.starts_with("# sample-app"));

    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, RequestStatus::Completed);
    assert_eq!(records[0].component_count, 2);
    assert_eq!(records[0].quality_score, Some(100.0));
    assert_eq!(records[0].fingerprint, Fingerprint::of_request(&request));

    let signals = pipeline.learning.wait_for(1).await;
    assert_eq!(signals[0].pattern_type, "prompt");
    assert!(signals[0].success);
    assert_eq!(signals[0].output["files"][0], "src/components/App.tsx");
}

#[tokio::test]
async fn empty_prompt_fails_before_any_capability_call() {
    let analysis = Arc::new(CountingAnalysis::new(&["App"]));
    let generation = Arc::new(CountingGenerator::new());
    let capabilities = CapabilitySet::new(
        analysis.clone(),
        Arc::new(StaticArchitecture),
        generation.clone(),
        Arc::new(StaticValidator::clean()),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let err = pipeline
        .orchestrator
        .generate(prompt_request(""))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.to_string(), "invalid request: prompt is empty");
    assert_eq!(analysis.calls(), 0);
    assert_eq!(generation.calls(), 0);

    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, RequestStatus::Failed);
    let failure = records[0].failure.as_ref().unwrap();
    assert_eq!(failure.code, "validation_error");
}

#[tokio::test]
async fn failed_component_is_dropped_without_failing_the_batch() {
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["Alpha", "Beta", "Gamma"])),
        Arc::new(StaticArchitecture),
        Arc::new(FailingGenerator::new("Beta")),
        Arc::new(StaticValidator::clean()),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let result = pipeline
        .orchestrator
        .generate(prompt_request("Create a board"))
        .await
        .unwrap();

    let names: Vec<&str> = result
        .components
        .iter()
        .map(|component| component.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Gamma"]);
    assert_eq!(result.metrics.total_components, 2);

    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records[0].status, RequestStatus::Completed);
    assert_eq!(records[0].component_count, 2);
}

#[tokio::test]
async fn identical_requests_share_one_generation() {
    let generation = Arc::new(CountingGenerator::new());
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App", "TaskList"])),
        Arc::new(StaticArchitecture),
        generation.clone(),
        Arc::new(StaticValidator::clean()),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let first = pipeline
        .orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();
    let calls_after_first = generation.calls();
    assert!(calls_after_first > 0);

    // Different request id, same fingerprint
    let second = pipeline
        .orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();

    assert_eq!(generation.calls(), calls_after_first);
    assert_eq!(second.request_id, first.request_id);
    assert_eq!(
        serde_json::to_value(&second).unwrap(),
        serde_json::to_value(&first).unwrap()
    );

    // Cache hits append no history and emit no signal
    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    let signals = pipeline.learning.wait_for(1).await;
    assert_eq!(signals.len(), 1);
}

#[tokio::test]
async fn disabled_cache_repeats_full_runs_with_stable_structure() {
    let pipeline = setup_pipeline();
    let options = RequestOptions::new().with_cache(false);
    let request = |prompt: &str| prompt_request(prompt).with_options(options.clone());

    let first = pipeline
        .orchestrator
        .generate(request("Create a task tracker"))
        .await
        .unwrap();
    let second = pipeline
        .orchestrator
        .generate(request("Create a task tracker"))
        .await
        .unwrap();

    assert_ne!(second.request_id, first.request_id);
    let shape = |result: &GenerationResult| {
        result
            .components
            .iter()
            .map(|component| {
                (
                    component.name.clone(),
                    component.kind,
                    component.file_path.clone(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first.components[0].kind, ComponentKind::Component);

    // Nothing was written back
    let fingerprint = Fingerprint::of_request(&request("Create a task tracker"));
    assert!(pipeline.results.get(&fingerprint).await.unwrap().is_none());

    // Both full runs hit history
    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn faulty_result_store_degrades_to_cache_miss() {
    let generation = Arc::new(CountingGenerator::new());
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App"])),
        Arc::new(StaticArchitecture),
        generation.clone(),
        Arc::new(StaticValidator::clean()),
    );
    let orchestrator = GenerationOrchestrator::new(
        OrchestratorConfig::new(),
        capabilities,
        Arc::new(RecordingLearning::new()),
        Arc::new(FaultyResultStore),
        Arc::new(MemoryHistoryStore::new()),
    );

    let first = orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();
    let calls_after_first = generation.calls();
    assert!(calls_after_first > 0);
    assert_eq!(first.components.len(), 1);
    assert!(first.validated);

    // The write-back failed too, so the identical request runs in full again
    let second = orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();
    assert_eq!(generation.calls(), calls_after_first * 2);
    assert_ne!(second.request_id, first.request_id);
}

#[tokio::test]
async fn analysis_failure_degrades_to_minimal_plan() {
    let capabilities = CapabilitySet::new(
        Arc::new(UnavailableAnalysis),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(StaticValidator::clean()),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let result = pipeline
        .orchestrator
        .generate(prompt_request("Create a recipe box"))
        .await
        .unwrap();

    assert!(result.degraded);
    assert_eq!(result.components.len(), 1);
    assert_eq!(result.components[0].name, "App");
    assert_eq!(result.components[0].kind, ComponentKind::Page);
    assert!(result.validated);
}

#[tokio::test]
async fn validator_outage_degrades_score_but_completes() {
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App"])),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(UnavailableValidator),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let result = pipeline
        .orchestrator
        .generate(prompt_request("Create a gallery"))
        .await
        .unwrap();

    assert!(result.degraded);
    assert!(!result.validated);
    assert_eq!(result.validation.score, 50.0);
    assert!(result.validation.errors[0].starts_with("validation unavailable:"));
    // 0.7 * 50 compliance + 0.3 * 100 simplicity
    assert_eq!(result.quality_score, 65.0);

    let signals = pipeline.learning.wait_for(1).await;
    assert!(!signals[0].success);
}

#[tokio::test]
async fn harsh_validation_lowers_quality() {
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App"])),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(StaticValidator::scored(40.0)),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let result = pipeline
        .orchestrator
        .generate(prompt_request("Create a gallery"))
        .await
        .unwrap();

    assert!(result.validation.performed);
    assert_eq!(result.quality_score, 58.0);
    assert!(!result.meets_threshold(70.0));
}

#[tokio::test]
async fn unresolved_blueprint_is_rejected() {
    let pipeline = setup_pipeline();
    let request = GenerationRequest::new(
        GenerationInput::Blueprint(BlueprintRef::unresolved("bp-404")),
        "typescript",
    );

    let err = pipeline.orchestrator.generate(request).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("bp-404"));
}

#[tokio::test]
async fn cancelled_token_aborts_before_analysis() {
    let pipeline = setup_pipeline();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = pipeline
        .orchestrator
        .generate_with_cancellation(prompt_request("Create a wiki"), cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Cancelled));
    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].failure.as_ref().unwrap().code, "cancelled");
}

#[tokio::test]
async fn cancellation_during_synthesis_stops_remaining_calls() {
    let cancel = CancellationToken::new();
    let generation = Arc::new(CancellingGenerator::new(cancel.clone()));
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["Alpha", "Beta", "Gamma"])),
        Arc::new(StaticArchitecture),
        generation.clone(),
        Arc::new(StaticValidator::clean()),
    );
    let orchestrator = GenerationOrchestrator::new(
        OrchestratorConfig::new().with_max_concurrent_synthesis(1),
        capabilities,
        Arc::new(RecordingLearning::new()),
        Arc::new(MemoryResultStore::new(16)),
        Arc::new(MemoryHistoryStore::new()),
    );

    let err = orchestrator
        .generate_with_cancellation(prompt_request("Create a board"), cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Cancelled));
    // Only the call that tripped the token reached the capability
    assert_eq!(generation.calls(), 1);
}

#[tokio::test]
async fn history_returns_newest_first() {
    let pipeline = setup_pipeline();

    pipeline
        .orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();
    let second = pipeline
        .orchestrator
        .generate(prompt_request("Create a recipe box"))
        .await
        .unwrap();

    let history = pipeline.orchestrator.history();
    let records = history.recent(10).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].request_id, second.request_id);
    assert!(records.iter().all(|record| record.total_lines > 0));

    let limited = history.recent(1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn history_fault_never_discards_a_result() {
    let capabilities = CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App", "TaskList"])),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(StaticValidator::clean()),
    );
    let learning = Arc::new(RecordingLearning::new());
    let orchestrator = GenerationOrchestrator::new(
        OrchestratorConfig::new(),
        capabilities,
        learning.clone(),
        Arc::new(MemoryResultStore::new(16)),
        Arc::new(FaultyHistoryStore),
    );

    let result = orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();

    assert_eq!(result.components.len(), 2);
    assert!(result.validated);
    // The pipeline still reaches the learning stage after the failed append
    let signals = learning.wait_for(1).await;
    assert!(signals[0].success);
}

#[tokio::test]
async fn case_variant_requests_share_the_cache() {
    let pipeline = setup_pipeline();

    let first = pipeline
        .orchestrator
        .generate(prompt_request("Create a task tracker"))
        .await
        .unwrap();

    let mut variant = prompt_request("Create a task tracker");
    variant.language = " TypeScript ".to_string();
    variant.framework = Some("React".to_string());
    let second = pipeline.orchestrator.generate(variant).await.unwrap();

    assert_eq!(second.request_id, first.request_id);
    let records = pipeline.history.recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn disabled_validation_is_optimistic() {
    let pipeline = setup_pipeline();
    let request = prompt_request("Create a journal")
        .with_options(RequestOptions::new().with_validation(false));

    let result = pipeline.orchestrator.generate(request).await.unwrap();

    assert!(!result.validation.performed);
    assert!(result.validated);
    assert_eq!(result.validation.score, 100.0);
    assert!(!result.degraded);
}

#[tokio::test]
async fn explicit_specification_bypasses_analysis() {
    let analysis = Arc::new(CountingAnalysis::new(&["ShouldNotAppear"]));
    let capabilities = CapabilitySet::new(
        analysis.clone(),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(StaticValidator::clean()),
    );
    let pipeline = setup_pipeline_with(capabilities);

    let specification = sample_specification(&["Editor", "Preview"]);
    let request = GenerationRequest::new(
        GenerationInput::Specification(Box::new(specification)),
        "typescript",
    )
    .with_framework("react");

    let result = pipeline.orchestrator.generate(request).await.unwrap();

    assert_eq!(analysis.calls(), 0);
    let names: Vec<&str> = result
        .components
        .iter()
        .map(|component| component.name.as_str())
        .collect();
    assert_eq!(names, vec!["Editor", "Preview"]);
}
