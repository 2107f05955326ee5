// crates/types/src/signal.rs
//! Signals: a natural-language direction plus the source references it
//! draws from, optionally tagged with a target content kind.
//!
//! Signals are produced elsewhere in the host application and handed to the
//! orchestrator as a complete in-memory set whenever the active context
//! changes. They carry no stable identity — equality for disambiguation is
//! positional within the current set.

use serde::{Deserialize, Serialize};

use crate::kind::ContentKind;

/// Reference to a source document attached to the active context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source_id: String,
}

impl SourceRef {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
        }
    }
}

/// A generation intent: direction, sources, and optional kind-specific hints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signal {
    /// Natural-language intent ("turn this into a study guide", ...).
    pub direction: String,
    /// Source documents the generation should draw from.
    pub sources: Vec<SourceRef>,
    /// Kind this signal was produced for, if the producer tagged one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_kind: Option<ContentKind>,
    /// SEO keyword hint (blog posts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_keyword: Option<String>,
    /// Blog format hint ("listicle", "how-to", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_type: Option<String>,
}

impl Signal {
    /// Convenience constructor for the common direction + single-source case.
    pub fn new(direction: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            direction: direction.into(),
            sources: vec![SourceRef::new(source_id)],
            ..Self::default()
        }
    }

    /// The first source id, if the signal carries any sources at all.
    ///
    /// Most kinds generate from a single primary source; callers that need
    /// the full set iterate `sources` directly.
    pub fn primary_source_id(&self) -> Option<&str> {
        self.sources.first().map(|s| s.source_id.as_str())
    }
}
