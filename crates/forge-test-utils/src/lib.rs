//! Testing utilities for the Forge workspace
//!
//! Shared capability fakes, fixtures, and pipeline setup.

#![allow(missing_docs)]

use forge_capability::{
    AnalysisCapability, AnalysisOutcome, AnalysisRequest, ArchitectureCapability,
    ArchitectureOutcome, ArchitectureRequest, CapabilityError, CapabilitySet, CodeGenRequest,
    CodeGenerationCapability, LearningCapability, LearningSignal, SourceFile, ValidationCapability,
    ValidationOutcome,
};
use forge_core::{GenerationOrchestrator, OrchestratorConfig};
use forge_spec::{
    ArchitectureSpec, ComponentDescriptor, ComponentKind, GenerationInput, GenerationRequest,
    TechnicalSpecification,
};
use forge_store::{HistoryStore, MemoryHistoryStore, MemoryResultStore, ResultStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Install a tracing subscriber that honors `RUST_LOG`, once per process
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Capability fakes
// ---------------------------------------------------------------------------

/// Analysis fake returning a fixed specification
pub struct StaticAnalysis {
    pub specification: TechnicalSpecification,
    pub confidence: f64,
}

impl StaticAnalysis {
    pub fn new(specification: TechnicalSpecification) -> Self {
        Self {
            specification,
            confidence: 0.9,
        }
    }

    /// A plan containing exactly the named components
    pub fn planning(names: &[&str]) -> Self {
        Self::new(sample_specification(names))
    }
}

#[async_trait::async_trait]
impl AnalysisCapability for StaticAnalysis {
    async fn analyze(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, CapabilityError> {
        Ok(AnalysisOutcome {
            specification: self.specification.clone(),
            context: None,
            confidence: self.confidence,
        })
    }
}

pub struct UnavailableAnalysis;

#[async_trait::async_trait]
impl AnalysisCapability for UnavailableAnalysis {
    async fn analyze(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, CapabilityError> {
        Err(CapabilityError::unavailable("analysis offline"))
    }
}

/// Architecture fake proposing a fixed component-based layout
pub struct StaticArchitecture;

#[async_trait::async_trait]
impl ArchitectureCapability for StaticArchitecture {
    async fn process(
        &self,
        _request: &ArchitectureRequest,
    ) -> Result<ArchitectureOutcome, CapabilityError> {
        let architecture = ArchitectureSpec {
            style: "component-based".to_string(),
            layers: vec!["components".to_string(), "services".to_string()],
            patterns: vec!["hooks".to_string()],
            confidence: 0.8,
        };
        Ok(ArchitectureOutcome {
            architecture,
            reasoning: "standard interactive layout".to_string(),
            confidence: 0.8,
        })
    }
}

pub struct UnavailableArchitecture;

#[async_trait::async_trait]
impl ArchitectureCapability for UnavailableArchitecture {
    async fn process(
        &self,
        _request: &ArchitectureRequest,
    ) -> Result<ArchitectureOutcome, CapabilityError> {
        Err(CapabilityError::unavailable("architecture offline"))
    }
}

/// Deterministic source for a component prompt
pub fn template_source(prompt: &str) -> String {
    let heading = prompt.lines().next().unwrap_or("component");
    format!(
        "// {heading}\nimport React from 'react';\n\nexport default function Generated() {{\n  return null;\n}}\n"
    )
}

/// Deterministic test file
pub fn template_test() -> String {
    "test('behaves', () => { expect(true).toBe(true); });\n".to_string()
}

/// Code generation fake producing deterministic source per prompt
pub struct TemplateGenerator;

#[async_trait::async_trait]
impl CodeGenerationCapability for TemplateGenerator {
    async fn generate(&self, request: &CodeGenRequest) -> Result<String, CapabilityError> {
        if request.prompt.starts_with("Write unit tests") {
            Ok(template_test())
        } else {
            Ok(template_source(&request.prompt))
        }
    }
}

/// Fails for prompts mentioning one component, succeeds for the rest
pub struct FailingGenerator {
    pub fail_for: String,
}

impl FailingGenerator {
    pub fn new(fail_for: impl Into<String>) -> Self {
        Self {
            fail_for: fail_for.into(),
        }
    }
}

#[async_trait::async_trait]
impl CodeGenerationCapability for FailingGenerator {
    async fn generate(&self, request: &CodeGenRequest) -> Result<String, CapabilityError> {
        if request.prompt.contains(&self.fail_for) {
            Err(CapabilityError::unavailable("generation rejected"))
        } else if request.prompt.starts_with("Write unit tests") {
            Ok(template_test())
        } else {
            Ok(template_source(&request.prompt))
        }
    }
}

/// Counts every generation call; otherwise behaves like [`TemplateGenerator`]
#[derive(Default)]
pub struct CountingGenerator {
    calls: AtomicUsize,
}

impl CountingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CodeGenerationCapability for CountingGenerator {
    async fn generate(&self, request: &CodeGenRequest) -> Result<String, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.prompt.starts_with("Write unit tests") {
            Ok(template_test())
        } else {
            Ok(template_source(&request.prompt))
        }
    }
}

/// Validation fake returning a fixed verdict
pub struct StaticValidator {
    pub score: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl StaticValidator {
    pub fn clean() -> Self {
        Self {
            score: 100.0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn scored(score: f64) -> Self {
        Self {
            score,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl ValidationCapability for StaticValidator {
    async fn validate(&self, _files: &[SourceFile]) -> Result<ValidationOutcome, CapabilityError> {
        Ok(ValidationOutcome {
            score: self.score,
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
        })
    }
}

pub struct UnavailableValidator;

#[async_trait::async_trait]
impl ValidationCapability for UnavailableValidator {
    async fn validate(&self, _files: &[SourceFile]) -> Result<ValidationOutcome, CapabilityError> {
        Err(CapabilityError::unavailable("validator offline"))
    }
}

/// Learning fake recording every delivered signal
#[derive(Default)]
pub struct RecordingLearning {
    signals: Mutex<Vec<LearningSignal>>,
}

impl RecordingLearning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<LearningSignal> {
        self.signals.lock().clone()
    }

    /// Wait for at least `count` signals; panics after one second
    pub async fn wait_for(&self, count: usize) -> Vec<LearningSignal> {
        for _ in 0..1000 {
            let signals = self.signals();
            if signals.len() >= count {
                return signals;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("expected {count} learning signals, got {}", self.signals().len());
    }
}

#[async_trait::async_trait]
impl LearningCapability for RecordingLearning {
    async fn record(&self, signal: LearningSignal) -> Result<(), CapabilityError> {
        self.signals.lock().push(signal);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Specification planning exactly the named components
pub fn sample_specification(names: &[&str]) -> TechnicalSpecification {
    let mut specification = TechnicalSpecification::minimal("sample-app", "typescript");
    specification.description = "Sample application".to_string();
    specification.stack = specification.stack.with_framework("react");
    specification.components = names
        .iter()
        .map(|name| ComponentDescriptor::new(*name, ComponentKind::Component))
        .collect();
    specification
}

/// Prompt-mode request targeting typescript/react
pub fn prompt_request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(GenerationInput::Prompt(prompt.to_string()), "typescript")
        .with_framework("react")
        .with_project("project-1")
        .with_user("user-1")
}

// ---------------------------------------------------------------------------
// Pipeline setup
// ---------------------------------------------------------------------------

/// An orchestrator plus handles to its in-memory stores and fakes
pub struct PipelineHandles {
    pub orchestrator: GenerationOrchestrator,
    pub results: Arc<MemoryResultStore>,
    pub history: Arc<MemoryHistoryStore>,
    pub learning: Arc<RecordingLearning>,
}

/// Capabilities that succeed on every call
pub fn happy_capabilities() -> CapabilitySet {
    CapabilitySet::new(
        Arc::new(StaticAnalysis::planning(&["App", "TaskList"])),
        Arc::new(StaticArchitecture),
        Arc::new(TemplateGenerator),
        Arc::new(StaticValidator::clean()),
    )
}

/// Orchestrator over in-memory stores with happy-path capabilities
pub fn setup_pipeline() -> PipelineHandles {
    setup_pipeline_with(happy_capabilities())
}

/// Orchestrator over in-memory stores with the given capabilities
pub fn setup_pipeline_with(capabilities: CapabilitySet) -> PipelineHandles {
    let results = Arc::new(MemoryResultStore::new(64));
    let history = Arc::new(MemoryHistoryStore::new());
    let learning = Arc::new(RecordingLearning::new());
    let orchestrator = GenerationOrchestrator::new(
        OrchestratorConfig::new(),
        capabilities,
        learning.clone() as Arc<dyn LearningCapability>,
        results.clone() as Arc<dyn ResultStore>,
        history.clone() as Arc<dyn HistoryStore>,
    );
    PipelineHandles {
        orchestrator,
        results,
        history,
        learning,
    }
}
