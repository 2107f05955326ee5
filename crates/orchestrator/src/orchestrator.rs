// crates/orchestrator/src/orchestrator.rs
//! The orchestrator root: registry + router + picker + source index.
//!
//! One owned context value, shared as `Arc<Orchestrator>` — never a global.
//! Independent instances (tests, previews) share nothing.

use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;

use studio_types::{ContentKind, Signal};

use crate::config::StudioConfig;
use crate::index::ValidSourceIdIndex;
use crate::picker::PickerState;
use crate::registry::{Handler, HandlerRegistry};

/// Router/picker lifecycle events, for observability and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    /// A handler was invoked for this kind.
    Dispatched { kind: ContentKind },
    /// A request arrived for a kind with no registered handler.
    DispatchMissed { kind: ContentKind },
    /// Multiple candidates; the picker opened and awaits the user.
    PickerOpened { kind: ContentKind, candidates: usize },
    PickerResolved { kind: ContentKind },
    PickerDismissed,
    /// The signal set was replaced wholesale (active context changed).
    SignalsReplaced { signals: usize, sources: usize },
}

pub struct Orchestrator {
    config: StudioConfig,
    registry: HandlerRegistry,
    picker: Mutex<PickerState>,
    signals: RwLock<Vec<Signal>>,
    index: RwLock<ValidSourceIdIndex>,
    events_tx: broadcast::Sender<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new(config: StudioConfig) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            config,
            registry: HandlerRegistry::new(),
            picker: Mutex::new(PickerState::closed()),
            signals: RwLock::new(Vec::new()),
            index: RwLock::new(ValidSourceIdIndex::default()),
            events_tx,
        })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events_tx.subscribe()
    }

    /// Register a kind's invoke handler (module mount; last wins).
    pub fn register(&self, kind: ContentKind, handler: Handler) {
        self.registry.register(kind, handler);
    }

    pub fn is_registered(&self, kind: ContentKind) -> bool {
        self.registry.is_registered(kind)
    }

    // -- Signals & source index -----------------------------------------------

    /// Replace the signal set wholesale (the active context changed) and
    /// rebuild the source index. Never mutated incrementally.
    pub fn replace_signals(&self, signals: Vec<Signal>) {
        let index = ValidSourceIdIndex::rebuild(&signals);
        let sources = index.len();
        let count = signals.len();

        match self.index.write() {
            Ok(mut slot) => *slot = index,
            Err(e) => tracing::error!("RwLock poisoned writing source index: {e}"),
        }
        match self.signals.write() {
            Ok(mut slot) => *slot = signals,
            Err(e) => tracing::error!("RwLock poisoned writing signals: {e}"),
        }

        tracing::debug!(signals = count, sources, "signal set replaced");
        self.emit(OrchestratorEvent::SignalsReplaced {
            signals: count,
            sources,
        });
    }

    /// Snapshot of the current signal set.
    pub fn signals(&self) -> Vec<Signal> {
        match self.signals.read() {
            Ok(signals) => signals.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading signals: {e}");
                Vec::new()
            }
        }
    }

    /// Snapshot of the valid-source index (modules filter saved jobs by it).
    pub fn source_index(&self) -> ValidSourceIdIndex {
        match self.index.read() {
            Ok(index) => index.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading source index: {e}");
                ValidSourceIdIndex::default()
            }
        }
    }

    pub fn is_valid_source(&self, source_id: &str) -> bool {
        match self.index.read() {
            Ok(index) => index.contains(source_id),
            Err(_) => false,
        }
    }

    // -- Routing --------------------------------------------------------------

    /// Entry point for the tool launcher. `candidates` is the caller's
    /// filtered subset of the current signal set relevant to `kind`.
    ///
    /// One candidate dispatches immediately; several open the picker; an
    /// empty list is a caller defect (logged, nothing dispatched, nothing
    /// guessed at).
    pub fn request_generation(&self, kind: ContentKind, candidates: Vec<Signal>) {
        if candidates.is_empty() {
            tracing::error!(%kind, "request_generation with no candidate signals — caller bug");
        } else if let [signal] = candidates.as_slice() {
            self.dispatch(kind, signal.clone());
        } else {
            let n = candidates.len();
            tracing::debug!(%kind, candidates = n, "ambiguous request, opening picker");
            self.set_picker(PickerState::opened(kind, candidates));
            self.emit(OrchestratorEvent::PickerOpened { kind, candidates: n });
        }
    }

    /// The user picked one candidate: close the picker, then dispatch
    /// exactly that signal.
    pub fn on_select_signal(&self, kind: ContentKind, signal: Signal) {
        let was_open = {
            match self.picker.lock() {
                Ok(mut picker) => {
                    let open = picker.is_open_for(kind);
                    *picker = PickerState::closed();
                    open
                }
                Err(e) => {
                    tracing::error!("Mutex poisoned resolving picker: {e}");
                    false
                }
            }
        };
        if !was_open {
            tracing::warn!(%kind, "signal selected but picker was not open for this kind");
            return;
        }
        self.emit(OrchestratorEvent::PickerResolved { kind });
        self.dispatch(kind, signal);
    }

    /// The user dismissed the picker; nothing is dispatched.
    pub fn dismiss_picker(&self) {
        self.set_picker(PickerState::closed());
        self.emit(OrchestratorEvent::PickerDismissed);
    }

    /// Snapshot of the picker modal state.
    pub fn picker(&self) -> PickerState {
        match self.picker.lock() {
            Ok(picker) => picker.clone(),
            Err(e) => {
                tracing::error!("Mutex poisoned reading picker: {e}");
                PickerState::closed()
            }
        }
    }

    fn dispatch(&self, kind: ContentKind, signal: Signal) {
        if self.registry.dispatch(kind, signal) {
            self.emit(OrchestratorEvent::Dispatched { kind });
        } else {
            self.emit(OrchestratorEvent::DispatchMissed { kind });
        }
    }

    fn set_picker(&self, state: PickerState) {
        match self.picker.lock() {
            Ok(mut picker) => *picker = state,
            Err(e) => tracing::error!("Mutex poisoned writing picker: {e}"),
        }
    }

    fn emit(&self, event: OrchestratorEvent) {
        let _ = self.events_tx.send(event);
    }
}
