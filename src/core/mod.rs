//! Core mirror logic.
//!
//! This module contains the orchestrator that walks the catalog and the
//! state types it reports progress with.

pub mod orchestrator;
pub mod state;

pub use orchestrator::Orchestrator;
pub use state::{MirrorReport, WorkFailure, WorkState};
