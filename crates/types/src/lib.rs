// crates/types/src/lib.rs
//! Shared data model for the signal-studio generation pipeline.
//!
//! Pure types, no I/O: content kinds, signals, jobs, and the wire envelopes
//! exchanged with the remote generation service.

pub mod job;
pub mod kind;
pub mod signal;

pub use job::{
    Job, JobStatus, JobStatusResponse, ListJobsResponse, StartGenerationRequest,
    StartGenerationResponse,
};
pub use kind::ContentKind;
pub use signal::{Signal, SourceRef};
