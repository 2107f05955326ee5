// crates/orchestrator/src/registry.rs
//! Kind → invoke-handler registry.
//!
//! Modules register their handler at mount; a remount overwrites the
//! previous entry with a functionally identical one (last wins, entries are
//! never removed). Dispatch is fire-and-forget: the handler runs on its own
//! task and any failure is logged there, never propagated — the launcher UI
//! must stay responsive no matter what a single module does.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use futures_util::future::BoxFuture;

use studio_types::{ContentKind, Signal};

use crate::error::GenerateError;

/// A kind-specific invoke function: starts and supervises one job for one
/// signal. Errors are already user-surfaced by the module before they get
/// here; the registry's catch is a second line of defense.
pub type Handler =
    Arc<dyn Fn(Signal) -> BoxFuture<'static, Result<(), GenerateError>> + Send + Sync>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<ContentKind, Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for a kind.
    pub fn register(&self, kind: ContentKind, handler: Handler) {
        match self.handlers.write() {
            Ok(mut handlers) => {
                if handlers.insert(kind, handler).is_some() {
                    tracing::debug!(%kind, "handler re-registered (remount)");
                } else {
                    tracing::debug!(%kind, "handler registered");
                }
            }
            Err(e) => tracing::error!("RwLock poisoned writing handler map: {e}"),
        }
    }

    pub fn is_registered(&self, kind: ContentKind) -> bool {
        match self.handlers.read() {
            Ok(handlers) => handlers.contains_key(&kind),
            Err(e) => {
                tracing::error!("RwLock poisoned reading handler map: {e}");
                false
            }
        }
    }

    /// Fire-and-forget dispatch. Returns whether a handler existed; a miss
    /// is a developer-visible defect (a module failed to mount or dispatch
    /// raced the mount), logged loudly, never a user-facing failure.
    pub fn dispatch(&self, kind: ContentKind, signal: Signal) -> bool {
        let handler = match self.handlers.read() {
            Ok(handlers) => handlers.get(&kind).cloned(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading handler map: {e}");
                None
            }
        };

        let Some(handler) = handler else {
            tracing::error!(%kind, "dispatch with no registered handler — dropping request");
            return false;
        };

        tokio::spawn(async move {
            if let Err(e) = handler(signal).await {
                tracing::error!(%kind, "generation handler failed: {e}");
            }
        });
        true
    }
}
