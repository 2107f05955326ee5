// crates/orchestrator/src/error.rs
//! The generation error taxonomy.
//!
//! Every variant is user-visible and caught at the module boundary; nothing
//! here is allowed to escape a handler into the launcher UI. The split
//! matters to the frontend: a `Configuration` error points the user at
//! settings, everything else at "this one generation failed".

use thiserror::Error;

use studio_types::ContentKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// The signal lacked a field this kind requires. Caught before any
    /// network call, never retried.
    #[error("signal is missing required field `{field}`")]
    MissingField { field: &'static str },

    /// A required external provider is not set up. Distinct from a
    /// generation failure so the UI can link to settings.
    #[error("{provider} is not configured")]
    Configuration { provider: &'static str },

    /// The start call failed; no job exists. Carries the server's own
    /// message when it sent one.
    #[error("could not start generation: {message}")]
    Start { message: String },

    /// The job started but reached terminal `error` status.
    #[error("generation failed: {message}")]
    JobFailed { message: String },

    /// The poll ceiling was exhausted. The job may still finish
    /// server-side; the next saved-list refresh will pick it up if so.
    #[error("generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// A second invoke arrived while this kind's in-flight slot was taken.
    /// The launcher is supposed to disable the button; reject loudly rather
    /// than clobber the running job's progress slot.
    #[error("a {kind} generation is already running")]
    Busy { kind: ContentKind },
}

impl GenerateError {
    /// Whether the UI should route the user to settings instead of retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerateError::Configuration { .. })
    }
}
