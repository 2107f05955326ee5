// crates/types/src/job.rs
//! Jobs and the wire envelopes of the remote generation service.
//!
//! The status vocabulary is uniform across all kinds; two-stage kinds carry
//! a secondary `export_status` with the same vocabulary.

use serde::{Deserialize, Serialize};

use crate::kind::ContentKind;

/// Lifecycle status reported by the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Ready,
    Error,
}

impl JobStatus {
    /// Whether this status alone ends a job's lifecycle.
    ///
    /// Two-stage kinds additionally gate `Ready` on `export_status`; see
    /// [`Job::is_terminal`].
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Error)
    }

    /// The wire spelling, as sent by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Ready => "ready",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-tracked unit of generation work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub kind: ContentKind,
    pub status: JobStatus,
    /// Secondary export stage, reported by two-stage kinds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_status: Option<JobStatus>,
    /// Source document the job was generated from.
    pub source_id: String,
    /// Kind-specific result payload, present once the job is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Job {
    /// Kind-aware terminal check.
    ///
    /// A two-stage job that reports `status: ready` while its export stage
    /// is still running is NOT terminal — the export must also be ready.
    /// A terminal `error` ends the job regardless of export state.
    pub fn is_terminal(&self) -> bool {
        match self.status {
            JobStatus::Error => true,
            JobStatus::Ready => {
                !self.kind.is_two_stage() || self.export_status == Some(JobStatus::Ready)
            }
            JobStatus::Pending | JobStatus::Processing => false,
        }
    }

    /// Whether the job is still running server-side (adoptable on mount).
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }
}

/// `POST /{kind}/generate` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGenerationRequest {
    pub source_id: String,
    pub direction: String,
    /// Kind-specific extra arguments, flattened into the body.
    #[serde(flatten)]
    pub kind_args: serde_json::Map<String, serde_json::Value>,
}

/// `POST /{kind}/generate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGenerationResponse {
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /{kind}/jobs/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub success: bool,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /{kind}/jobs` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobsResponse {
    pub success: bool,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub error: Option<String>,
}
