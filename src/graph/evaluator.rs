// src/graph/evaluator.rs

//! Pure per-task state derivation.

use serde::Serialize;

use crate::graph::graph::TaskGraph;
use crate::graph::task::Task;
use crate::types::TaskState;

/// Why the engine changed a task's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// An actionable task gained a blocker that is not DONE.
    Blocked,
    /// Every present blocker of a BLOCKED task is DONE (or gone).
    Unblocked,
    /// A DONE task whose blocker reverted to non-DONE. This overrides a state
    /// that is normally only user-writable.
    Reblocked,
}

/// True iff at least one *present* blocker is not DONE.
///
/// Blocker ids with no task in the graph (deleted) never block.
pub fn is_blocked(task: &Task, graph: &TaskGraph) -> bool {
    task.blockers
        .iter()
        .filter_map(|id| graph.get(*id))
        .any(|blocker| !blocker.is_done())
}

/// Desired state for `task` given the current states of its blockers.
pub fn evaluate(task: &Task, graph: &TaskGraph) -> TaskState {
    evaluate_with_reason(task, graph)
        .map(|(state, _)| state)
        .unwrap_or(task.state)
}

/// Like [`evaluate`], but returns `None` when no change is needed and the
/// reason alongside the new state otherwise.
pub fn evaluate_with_reason(task: &Task, graph: &TaskGraph) -> Option<(TaskState, ChangeReason)> {
    let blocked = is_blocked(task, graph);

    match (blocked, task.state) {
        (true, TaskState::Blocked) => None,
        (true, TaskState::Done) => Some((TaskState::Blocked, ChangeReason::Reblocked)),
        (true, _) => Some((TaskState::Blocked, ChangeReason::Blocked)),
        (false, TaskState::Blocked) => Some((TaskState::Todo, ChangeReason::Unblocked)),
        (false, _) => None,
    }
}
