// crates/client/src/client.rs
//! Per-kind wrapper around the remote generation service.

use thiserror::Error;

use studio_types::{
    ContentKind, Job, JobStatusResponse, ListJobsResponse, StartGenerationRequest,
    StartGenerationResponse,
};

/// Errors from the generation service boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response (DNS, TLS, connect,
    /// body decode). Fatal for `start`, transient inside the poll loop.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered `success: false`. The message is the server's
    /// own wording and is surfaced to the user verbatim when present.
    #[error("{message}")]
    Rejected { message: String },

    /// `success: true` but the promised payload field was missing.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The attempt ceiling was exhausted before the job went terminal.
    /// The job may still finish server-side; this only ends client polling.
    #[error("gave up waiting for job {job_id} after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },
}

impl ClientError {
    fn rejected(error: Option<String>) -> Self {
        ClientError::Rejected {
            message: error.unwrap_or_else(|| "generation service rejected the request".into()),
        }
    }
}

/// A successfully started job, before any polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedJob {
    pub job_id: String,
    /// Display name of the originating source, when the service resolves one.
    pub source_name: Option<String>,
}

/// Handle to one kind's endpoints on the generation service.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared across all
/// kinds so connection pools are reused.
#[derive(Debug, Clone)]
pub struct JobClient {
    http: reqwest::Client,
    base_url: String,
    kind: ContentKind,
}

impl JobClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, kind: ContentKind) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            kind,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.kind.api_path(), tail)
    }

    /// Start a generation. No job exists (and no polling should begin) if
    /// this returns an error.
    pub async fn start(&self, request: &StartGenerationRequest) -> Result<StartedJob, ClientError> {
        let resp: StartGenerationResponse = self
            .http
            .post(self.url("generate"))
            .json(request)
            .send()
            .await?
            .json()
            .await?;

        if !resp.success {
            return Err(ClientError::rejected(resp.error));
        }
        let job_id = resp
            .job_id
            .ok_or_else(|| ClientError::Malformed("start response missing job_id".into()))?;

        tracing::info!(kind = %self.kind, %job_id, "generation started");
        Ok(StartedJob {
            job_id,
            source_name: resp.source_name,
        })
    }

    /// Fetch the current snapshot of one job.
    pub async fn get_status(&self, job_id: &str) -> Result<Job, ClientError> {
        let resp: JobStatusResponse = self
            .http
            .get(self.url(&format!("jobs/{job_id}")))
            .send()
            .await?
            .json()
            .await?;

        if !resp.success {
            return Err(ClientError::rejected(resp.error));
        }
        resp.job
            .ok_or_else(|| ClientError::Malformed("status response missing job".into()))
    }

    /// List this kind's saved jobs (newest first, as the server orders them).
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        let resp: ListJobsResponse = self
            .http
            .get(self.url("jobs"))
            .send()
            .await?
            .json()
            .await?;

        if !resp.success {
            return Err(ClientError::rejected(resp.error));
        }
        Ok(resp.jobs)
    }
}
