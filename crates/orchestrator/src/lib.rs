// crates/orchestrator/src/lib.rs
//! Generation job orchestration for signal-studio.
//!
//! The orchestrator is the one subsystem with real coordination in it: it
//! routes a generation request to the right per-kind handler (directly, or
//! after user disambiguation), runs the start → poll-until-terminal
//! lifecycle of the remote job, resumes jobs left in flight across a
//! restart, and guards every cross-await state write with a generation
//! token.
//!
//! Feature modules get one [`GenerationModule`] each from the generic
//! factory in [`module`]; everything kind-specific is data and small match
//! arms in [`kinds`] and on [`studio_types::ContentKind`].

pub mod config;
pub mod error;
pub mod index;
pub mod kinds;
pub mod module;
pub mod orchestrator;
pub mod picker;
pub mod registry;
pub mod touch;

pub use config::StudioConfig;
pub use error::GenerateError;
pub use index::ValidSourceIdIndex;
pub use module::{GenerationModule, ModuleEvent};
pub use orchestrator::{Orchestrator, OrchestratorEvent};
pub use picker::PickerState;
pub use registry::{Handler, HandlerRegistry};
pub use touch::RecentlyTouched;
