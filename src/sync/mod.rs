// src/sync/mod.rs

//! Write-back of converged states.
//!
//! This is the only concurrent part of a pass: once the engine has produced
//! its change list, [`coordinator::SyncCoordinator`] fires one independent
//! write per change and collects an explicit outcome for each.

pub mod coordinator;

pub use coordinator::{SyncCoordinator, SyncOutcome, SyncReport};
