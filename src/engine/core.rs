// src/engine/core.rs

//! Pure part of a pass.
//!
//! Given a refreshed snapshot and what an intent touched, decide the seed set
//! and converge. No Tokio, no IO; the async shell in [`super::board`] calls
//! into here between the mutation and the sync phase.

use tracing::debug;

use crate::engine::EditTarget;
use crate::graph::{Convergence, PropagationEngine, TaskGraph};
use crate::types::{DeletionReseed, TaskId, TaskState};

/// Ids that must be evaluated after an edit.
///
/// - A single-task edit seeds just that task; its dependents follow through
///   the worklist.
/// - A deletion seeds every currently BLOCKED task (or everything, per
///   `reseed`), since the snapshot no longer says who lost a blocker.
/// - A refresh seeds every task.
pub fn seed_set(target: EditTarget, graph: &TaskGraph, reseed: DeletionReseed) -> Vec<TaskId> {
    let seeds = match target {
        EditTarget::Task(id) => vec![id],
        EditTarget::Deletion(_) => match reseed {
            DeletionReseed::Blocked => graph.ids_in_state(TaskState::Blocked),
            DeletionReseed::All => graph.ids().collect(),
        },
        EditTarget::Everything => graph.ids().collect(),
    };

    debug!(edit = ?target, seeds = seeds.len(), "derived seed set");
    seeds
}

/// Seed and converge in one step.
pub fn plan_pass(
    engine: &PropagationEngine,
    graph: &TaskGraph,
    target: EditTarget,
    reseed: DeletionReseed,
) -> Convergence {
    let seeds = seed_set(target, graph, reseed);
    engine.converge(graph, seeds)
}
