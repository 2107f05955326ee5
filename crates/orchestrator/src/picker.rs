// crates/orchestrator/src/picker.rs
//! Modal state for disambiguating among multiple candidate signals.
//!
//! The picker never auto-picks: it opens with the full candidate list and
//! waits for an explicit user choice or dismissal. Both terminal actions
//! clear it back to the closed state.

use studio_types::{ContentKind, Signal};

/// Snapshot of the disambiguation modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickerState {
    pub open: bool,
    /// Kind the user asked to generate, when open.
    pub kind: Option<ContentKind>,
    /// Candidate signals, in signal-set order. Identity is positional.
    pub candidates: Vec<Signal>,
}

impl PickerState {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn opened(kind: ContentKind, candidates: Vec<Signal>) -> Self {
        Self {
            open: true,
            kind: Some(kind),
            candidates,
        }
    }

    /// Whether this picker is open for the given kind.
    pub fn is_open_for(&self, kind: ContentKind) -> bool {
        self.open && self.kind == Some(kind)
    }
}
