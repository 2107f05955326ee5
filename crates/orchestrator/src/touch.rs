// crates/orchestrator/src/touch.rs
//! Grace-window guard for optimistic writes racing polled state.
//!
//! When the user sees a result the instant it completes, the module has
//! written it locally before the server's list view reflects it. For a
//! bounded window the optimistic write wins; after the window expires the
//! poller's view is trusted again.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RecentlyTouched {
    grace: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl RecentlyTouched {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Mark an id as just written locally.
    pub fn touch(&self, id: impl Into<String>) {
        match self.entries.lock() {
            Ok(mut entries) => {
                let now = Instant::now();
                // Piggyback expiry pruning on writes so the map stays small.
                entries.retain(|_, touched| now.duration_since(*touched) < self.grace);
                entries.insert(id.into(), now);
            }
            Err(e) => tracing::error!("Mutex poisoned writing touch set: {e}"),
        }
    }

    /// Whether the id is still inside its grace window.
    pub fn is_fresh(&self, id: &str) -> bool {
        match self.entries.lock() {
            Ok(entries) => entries
                .get(id)
                .is_some_and(|touched| touched.elapsed() < self.grace),
            Err(e) => {
                tracing::error!("Mutex poisoned reading touch set: {e}");
                false
            }
        }
    }
}
