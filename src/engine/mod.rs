// src/engine/mod.rs

//! Orchestration of a full edit → converge → sync pass.
//!
//! This module ties together:
//! - the system-of-record port (mutations and snapshot refresh)
//! - the propagation engine (pure convergence on a private snapshot)
//! - the sync coordinator (concurrent best-effort write-back)
//!
//! The pure part (seed derivation and convergence) lives in [`core`]; the
//! async shell that talks to the system of record is [`board`].

use serde::Serialize;

use crate::graph::{StateChange, Task};
use crate::store::{NewTask, TaskPatch};
use crate::sync::SyncReport;
use crate::types::{DeletionReseed, TaskId, TaskState};

pub mod board;
pub mod core;

pub use board::Board;
pub use core::{plan_pass, seed_set};

/// A user intent submitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Re-fetch everything and converge the whole board.
    Refresh,
    Create(NewTask),
    Patch { id: TaskId, patch: TaskPatch },
    AddEdge { task: TaskId, blocker: TaskId },
    RemoveEdge { task: TaskId, blocker: TaskId },
    Delete { id: TaskId },
}

impl Intent {
    /// Shorthand for a user state transition.
    pub fn set_state(id: TaskId, state: TaskState) -> Self {
        Intent::Patch {
            id,
            patch: TaskPatch::state(state),
        }
    }
}

/// What an applied intent perturbed, which decides the seed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EditTarget {
    /// One task's state or blocker set changed.
    Task(TaskId),
    /// A task was deleted; which tasks lost a blocker is unknown.
    Deletion(TaskId),
    /// Global refresh.
    Everything,
}

/// Options that shape a pass, taken from `[config]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub sync_concurrency: usize,
    pub deletion_reseed: DeletionReseed,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            sync_concurrency: 8,
            deletion_reseed: DeletionReseed::Blocked,
        }
    }
}

/// Everything the presentation layer needs to know about one pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub target: EditTarget,
    /// The task returned by the system of record for create/patch intents.
    pub task: Option<Task>,
    /// Derived changes, in the order the engine applied them.
    pub changes: Vec<StateChange>,
    /// Tasks evaluated by the engine.
    pub visited: usize,
    pub sync: SyncReport,
}

impl PassReport {
    /// True if every derived change reached the system of record.
    pub fn fully_synced(&self) -> bool {
        self.sync.is_clean()
    }
}
