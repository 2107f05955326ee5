// crates/client/src/lib.rs
//! HTTP client for the remote generation service.
//!
//! One [`JobClient`] exists per content kind; all share the same start /
//! fetch-status / poll-until-terminal algorithm. The polling loop and its
//! adaptive backoff live in [`poll`].

pub mod client;
pub mod poll;

pub use client::{ClientError, JobClient, StartedJob};
pub use poll::{backoff_delay, PollConfig};
