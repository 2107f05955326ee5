// crates/orchestrator/src/index.rs
//! Fast lookup of "which source ids are currently valid".
//!
//! Rebuilt wholesale whenever the signal set is replaced (never mutated
//! incrementally). Every module filters its saved-jobs display through
//! this, which is what makes switching the active context instantly hide
//! jobs from sources that are no longer attached — no per-module refetch.

use std::collections::HashSet;

use studio_types::Signal;

/// Set of source ids referenced by the current signal set.
///
/// Rebuild is O(total source refs); membership is O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidSourceIdIndex {
    ids: HashSet<String>,
}

impl ValidSourceIdIndex {
    /// Flatten `signal.sources[*].source_id` across the whole set.
    pub fn rebuild(signals: &[Signal]) -> Self {
        let mut ids = HashSet::new();
        for signal in signals {
            for source in &signal.sources {
                ids.insert(source.source_id.clone());
            }
        }
        Self { ids }
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.ids.contains(source_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use studio_types::SourceRef;

    fn signal(ids: &[&str]) -> Signal {
        Signal {
            direction: "d".into(),
            sources: ids.iter().map(|id| SourceRef::new(*id)).collect(),
            ..Signal::default()
        }
    }

    #[test]
    fn rebuild_flattens_and_dedupes() {
        let index = ValidSourceIdIndex::rebuild(&[
            signal(&["a", "b"]),
            signal(&["b", "c"]),
            signal(&[]),
        ]);
        assert_eq!(index.len(), 3);
        assert!(index.contains("a"));
        assert!(index.contains("c"));
        assert!(!index.contains("d"));
    }

    #[test]
    fn empty_signal_set_yields_empty_index() {
        let index = ValidSourceIdIndex::rebuild(&[]);
        assert!(index.is_empty());
    }

    proptest! {
        /// index == union of every signal's source ids, exactly.
        #[test]
        fn rebuild_is_the_union(
            source_lists in prop::collection::vec(
                prop::collection::vec("[a-d][0-9]", 0..4),
                0..6,
            )
        ) {
            let signals: Vec<Signal> = source_lists
                .iter()
                .map(|ids| signal(&ids.iter().map(String::as_str).collect::<Vec<_>>()))
                .collect();
            let index = ValidSourceIdIndex::rebuild(&signals);

            let expected: HashSet<&String> = source_lists.iter().flatten().collect();
            prop_assert_eq!(index.len(), expected.len());
            for id in expected {
                prop_assert!(index.contains(id));
            }
        }
    }
}
