// crates/client/src/poll.rs
//! Poll-until-terminal loop with adaptive backoff.
//!
//! Generation jobs run from a few seconds to tens of minutes. The loop
//! polls at a fixed short interval first (fast jobs stay snappy), then
//! stretches the interval geometrically up to a cap (long jobs don't hammer
//! the service). Transient fetch failures never abort a multi-minute job;
//! only an explicit terminal status or the attempt ceiling ends the loop.

use std::time::Duration;

use studio_types::Job;

use crate::client::{ClientError, JobClient};

/// Timing knobs for the polling loop.
///
/// Defaults are the production constants. Tests inject millisecond-scale
/// values instead of faking the clock.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval used for the first `flat_attempts` polls.
    pub initial_interval: Duration,
    /// Number of polls at the fixed interval before growth kicks in.
    pub flat_attempts: u32,
    /// Multiplier applied per attempt after the flat phase.
    pub growth: f64,
    /// Upper bound on the interval.
    pub max_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(2),
            flat_attempts: 5,
            growth: 1.2,
            max_interval: Duration::from_secs(5),
        }
    }
}

/// Sleep duration after the given zero-based attempt.
///
/// Non-decreasing in `attempt` and never exceeds `max_interval`.
pub fn backoff_delay(config: &PollConfig, attempt: u32) -> Duration {
    if attempt < config.flat_attempts {
        return config.initial_interval;
    }
    let steps = attempt - config.flat_attempts + 1;
    // powi saturates to infinity for large exponents; mul_f64 would panic on
    // a non-finite factor, so clamp through the cap in seconds first.
    let grown = config.initial_interval.as_secs_f64() * config.growth.powi(steps as i32);
    let capped = grown.min(config.max_interval.as_secs_f64());
    Duration::from_secs_f64(capped)
}

impl JobClient {
    /// Poll `job_id` until `is_terminal` accepts a snapshot or `max_attempts`
    /// status checks have been spent.
    ///
    /// `on_progress` sees every non-terminal snapshot (drives the caller's
    /// progress indicator). A failed status fetch is logged and retried —
    /// a blip must not kill a 15-minute render — so the only exits are the
    /// terminal snapshot or [`ClientError::Timeout`].
    pub async fn poll<P, F>(
        &self,
        job_id: &str,
        config: &PollConfig,
        max_attempts: u32,
        is_terminal: P,
        mut on_progress: F,
    ) -> Result<Job, ClientError>
    where
        P: Fn(&Job) -> bool,
        F: FnMut(&Job),
    {
        for attempt in 0..max_attempts {
            match self.get_status(job_id).await {
                Ok(job) => {
                    if is_terminal(&job) {
                        tracing::debug!(kind = %self.kind(), %job_id, attempt, "job terminal");
                        return Ok(job);
                    }
                    on_progress(&job);
                }
                Err(e) => {
                    tracing::warn!(
                        kind = %self.kind(),
                        %job_id,
                        attempt,
                        "status check failed, will retry: {e}"
                    );
                }
            }
            // No sleep after the last attempt; the timeout below is the answer.
            if attempt + 1 < max_attempts {
                tokio::time::sleep(backoff_delay(config, attempt)).await;
            }
        }

        tracing::warn!(kind = %self.kind(), %job_id, max_attempts, "poll ceiling exhausted");
        Err(ClientError::Timeout {
            job_id: job_id.to_string(),
            attempts: max_attempts,
        })
    }
}
