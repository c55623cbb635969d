//! Generation results and history records
//!
//! The outbound side of the pipeline:
//! - Assembled results with components, validation report, and metrics
//! - Terminal request status plus structured failure info
//! - Append-only history records for analytics and learning retrieval

use crate::component::GeneratedComponent;
use crate::fingerprint::Fingerprint;
use crate::request::{GenerationRequest, InputMode, RequestId};
use crate::specification::ArchitectureSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final pipeline output, assembled exactly once per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Originating request
    pub request_id: RequestId,
    /// Target project
    pub project_id: String,
    /// Synthesized components in declaration order
    ///
    /// May be a strict subset of the planned components when individual
    /// syntheses failed.
    pub components: Vec<GeneratedComponent>,
    /// Merged architecture the components were generated against
    pub architecture: ArchitectureSpec,
    /// Rendered package manifest (serialization detail)
    pub package_manifest: String,
    /// Rendered readme (serialization detail)
    pub readme: String,
    /// Composite quality score in [0.0, 100.0]
    pub quality_score: f64,
    /// Whether the validation report carries zero errors
    ///
    /// Disabled validation yields an optimistic clean report, so this is
    /// `true` there too; a degraded report's synthetic error makes it
    /// `false`.
    pub validated: bool,
    /// Whether any stage fell back to a degraded default
    pub degraded: bool,
    /// Validation report
    pub validation: ValidationReport,
    /// Aggregate metrics
    pub metrics: GenerationMetrics,
}

impl GenerationResult {
    /// Whether this result clears the request's quality threshold
    #[inline]
    #[must_use]
    pub fn meets_threshold(&self, min_quality_score: f64) -> bool {
        self.validated && self.quality_score >= min_quality_score
    }
}

/// Outcome of the validation stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the external validation capability produced this verdict
    pub performed: bool,
    /// Compliance score in [0.0, 100.0]
    pub score: f64,
    /// Validation errors
    pub errors: Vec<String>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Validation was disabled: optimistic clean report
    #[must_use]
    pub fn optimistic() -> Self {
        Self {
            performed: false,
            score: 100.0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Validation capability failed: fixed degraded score with one
    /// synthetic error
    #[must_use]
    pub fn degraded(reason: impl std::fmt::Display) -> Self {
        Self {
            performed: false,
            score: 50.0,
            errors: vec![format!("validation unavailable: {reason}")],
            warnings: Vec::new(),
        }
    }

    /// Report produced by the external capability
    #[must_use]
    pub fn from_outcome(score: f64, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            performed: true,
            score: score.clamp(0.0, 100.0),
            errors,
            warnings,
        }
    }

    /// Whether the error list is empty
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate metrics of a completed generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Components actually synthesized (may be fewer than planned)
    pub total_components: usize,
    /// Total source lines across components
    pub total_lines: usize,
    /// Wall-clock pipeline duration in milliseconds
    pub generation_time_ms: u64,
    /// Companion tests generated
    pub tests_generated: usize,
}

/// Terminal status of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Pipeline produced a result (possibly degraded)
    Completed,
    /// Pipeline aborted without a result
    Failed,
}

impl RequestStatus {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured failure carried by history records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Append-only record of one completed or failed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Originating request
    pub request_id: RequestId,
    /// Target project
    pub project_id: String,
    /// Requesting user
    pub user_id: String,
    /// Input mode of the request
    pub mode: InputMode,
    /// Request fingerprint
    pub fingerprint: Fingerprint,
    /// Terminal status
    pub status: RequestStatus,
    /// Quality score, for completed runs
    pub quality_score: Option<f64>,
    /// Components synthesized
    pub component_count: usize,
    /// Total source lines across components
    pub total_lines: usize,
    /// Whether any stage fell back to a degraded default
    pub degraded: bool,
    /// Failure details, for failed runs
    pub failure: Option<FailureInfo>,
    /// Wall-clock pipeline duration in milliseconds
    pub duration_ms: u64,
    /// When the record was appended
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record for a completed generation
    #[must_use]
    pub fn completed(
        request: &GenerationRequest,
        fingerprint: Fingerprint,
        result: &GenerationResult,
        duration_ms: u64,
    ) -> Self {
        Self {
            request_id: request.id,
            project_id: request.project_id.clone(),
            user_id: request.user_id.clone(),
            mode: request.mode(),
            fingerprint,
            status: RequestStatus::Completed,
            quality_score: Some(result.quality_score),
            component_count: result.components.len(),
            total_lines: result.metrics.total_lines,
            degraded: result.degraded,
            failure: None,
            duration_ms,
            recorded_at: Utc::now(),
        }
    }

    /// Record for a failed generation
    #[must_use]
    pub fn failed(
        request: &GenerationRequest,
        fingerprint: Fingerprint,
        code: impl Into<String>,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            request_id: request.id,
            project_id: request.project_id.clone(),
            user_id: request.user_id.clone(),
            mode: request.mode(),
            fingerprint,
            status: RequestStatus::Failed,
            quality_score: None,
            component_count: 0,
            total_lines: 0,
            degraded: false,
            failure: Some(FailureInfo {
                code: code.into(),
                message: message.into(),
            }),
            duration_ms,
            recorded_at: Utc::now(),
        }
    }
}
