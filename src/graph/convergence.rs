// src/graph/convergence.rs

//! Result types for a single convergence pass.

use serde::Serialize;

use crate::graph::evaluator::ChangeReason;
use crate::graph::graph::TaskGraph;
use crate::types::{TaskId, TaskState};

/// One derived state change produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub id: TaskId,
    pub from: TaskState,
    pub to: TaskState,
    pub reason: ChangeReason,
}

/// Structured result of one convergence pass.
#[derive(Debug, Clone)]
pub struct Convergence {
    /// Converged snapshot. Equal to the input graph apart from `changes`.
    pub graph: TaskGraph,
    /// Changes in the order they were applied to the working copy. Each task
    /// id appears at most once.
    pub changes: Vec<StateChange>,
    /// Number of present tasks that were evaluated.
    pub visited: usize,
}

impl Convergence {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn change_for(&self, id: TaskId) -> Option<&StateChange> {
        self.changes.iter().find(|c| c.id == id)
    }
}
