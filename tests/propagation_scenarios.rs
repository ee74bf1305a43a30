// tests/propagation_scenarios.rs

mod common;
use crate::common::builders::GraphBuilder;
use crate::common::init_tracing;

use blockwise::engine::{EditTarget, seed_set};
use blockwise::graph::{ChangeReason, PropagationEngine, TaskGraph};
use blockwise::types::{DeletionReseed, TaskId, TaskState};

use TaskState::{Backlog, Blocked, Done, InProgress, Todo};

fn id(n: u64) -> TaskId {
    TaskId(n)
}

fn state_of(graph: &TaskGraph, n: u64) -> TaskState {
    graph.get(id(n)).expect("task should exist").state
}

/// D blocked-by {B, C}; B blocked-by {A}; C blocked-by {A}.
/// A=1, B=2, C=3, D=4.
fn diamond(c_state: TaskState, d_state: TaskState) -> TaskGraph {
    GraphBuilder::new()
        .task(1, Done)
        .task(2, Done)
        .task(3, c_state)
        .task(4, d_state)
        .blocked_by(2, 1)
        .blocked_by(3, 1)
        .blocked_by(4, 2)
        .blocked_by(4, 3)
        .build()
}

#[test]
fn diamond_with_one_open_branch_blocks_the_join() {
    init_tracing();

    let graph = diamond(Todo, Todo);
    let result = PropagationEngine::new().converge_all(&graph);

    assert_eq!(state_of(&result.graph, 4), Blocked);
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].id, id(4));
    assert_eq!(result.changes[0].reason, ChangeReason::Blocked);
}

#[test]
fn diamond_closing_last_branch_unblocks_join_exactly_once() {
    init_tracing();

    // C has just been moved to DONE; D still carries its old BLOCKED state.
    let graph = diamond(Done, Blocked);
    let result = PropagationEngine::new().converge(&graph, [id(3)]);

    assert_eq!(state_of(&result.graph, 4), Todo);

    let for_d: Vec<_> = result.changes.iter().filter(|c| c.id == id(4)).collect();
    assert_eq!(for_d.len(), 1, "D must change exactly once: {:?}", result.changes);
    assert_eq!(for_d[0].from, Blocked);
    assert_eq!(for_d[0].to, Todo);
    assert_eq!(for_d[0].reason, ChangeReason::Unblocked);
    assert_eq!(result.changes.len(), 1);
}

#[test]
fn chain_revert_reblocks_every_downstream_task_in_one_pass() {
    init_tracing();

    // A blocks B blocks C; A has just reverted DONE -> TODO.
    let graph = GraphBuilder::new()
        .task(1, Todo)
        .task(2, Done)
        .task(3, Done)
        .blocked_by(2, 1)
        .blocked_by(3, 2)
        .build();

    let result = PropagationEngine::new().converge(&graph, [id(1)]);

    assert_eq!(state_of(&result.graph, 1), Todo);
    assert_eq!(state_of(&result.graph, 2), Blocked);
    assert_eq!(state_of(&result.graph, 3), Blocked);

    let reasons: Vec<_> = result.changes.iter().map(|c| (c.id, c.reason)).collect();
    assert_eq!(
        reasons,
        vec![(id(2), ChangeReason::Reblocked), (id(3), ChangeReason::Reblocked)]
    );
}

#[test]
fn unchanged_task_still_reaches_its_dependents() {
    init_tracing();

    // A is DONE and B is already correct (TODO). C is DONE but B is not, so
    // C is stale even though nothing upstream changes in this pass.
    let graph = GraphBuilder::new()
        .task(1, Done)
        .task(2, Todo)
        .task(3, Done)
        .blocked_by(2, 1)
        .blocked_by(3, 2)
        .build();

    let result = PropagationEngine::new().converge(&graph, [id(1)]);

    assert_eq!(result.visited, 3);
    assert_eq!(state_of(&result.graph, 2), Todo);
    assert_eq!(state_of(&result.graph, 3), Blocked);
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].reason, ChangeReason::Reblocked);
}

#[test]
fn deleted_blocker_never_blocks() {
    init_tracing();

    // Blocker #1 is gone from the snapshot; T still lists it.
    let graph = GraphBuilder::new().task(2, Blocked).blocked_by(2, 1).build();

    assert!(graph.blockers_of(id(2)).contains(&id(1)));
    assert!(graph.get(id(1)).is_none());

    let seeds = seed_set(EditTarget::Deletion(id(1)), &graph, DeletionReseed::Blocked);
    assert_eq!(seeds, vec![id(2)]);

    let result = PropagationEngine::new().converge(&graph, seeds);
    assert_eq!(state_of(&result.graph, 2), Todo);
    assert_eq!(result.changes[0].reason, ChangeReason::Unblocked);
}

#[test]
fn deletion_reseed_all_seeds_every_task() {
    let graph = GraphBuilder::new()
        .task(1, Todo)
        .task(2, Blocked)
        .task(3, Done)
        .build();

    let blocked_only = seed_set(EditTarget::Deletion(id(9)), &graph, DeletionReseed::Blocked);
    let everything = seed_set(EditTarget::Deletion(id(9)), &graph, DeletionReseed::All);

    assert_eq!(blocked_only, vec![id(2)]);
    assert_eq!(everything, vec![id(1), id(2), id(3)]);
    assert_eq!(
        seed_set(EditTarget::Task(id(3)), &graph, DeletionReseed::All),
        vec![id(3)]
    );
}

#[test]
fn blocker_cycle_terminates_with_both_tasks_blocked() {
    init_tracing();

    let graph = GraphBuilder::new()
        .task(1, Todo)
        .task(2, Todo)
        .blocked_by(1, 2)
        .blocked_by(2, 1)
        .build();

    let result = PropagationEngine::new().converge_all(&graph);

    assert_eq!(result.visited, 2);
    assert_eq!(state_of(&result.graph, 1), Blocked);
    assert_eq!(state_of(&result.graph, 2), Blocked);
    assert_eq!(result.graph.blocker_cycles(), vec![vec![id(1), id(2)]]);

    // No legal exit: a second pass keeps both BLOCKED.
    let again = PropagationEngine::new().converge_all(&result.graph);
    assert!(again.is_noop());
}

#[test]
fn converging_a_converged_graph_is_a_noop() {
    init_tracing();

    let engine = PropagationEngine::new();
    let first = engine.converge_all(&diamond(Todo, Todo));
    assert!(!first.is_noop());

    let second = engine.converge_all(&first.graph);
    assert!(second.is_noop(), "unexpected changes: {:?}", second.changes);
    assert_eq!(second.graph, first.graph);
}

#[test]
fn absent_seeds_are_skipped() {
    let graph = GraphBuilder::new().task(1, Todo).build();

    let result = PropagationEngine::new().converge(&graph, [id(42), id(43)]);

    assert_eq!(result.visited, 0);
    assert!(result.is_noop());
    assert_eq!(result.graph, graph);
}

#[test]
fn stale_multi_seed_snapshot_is_evaluated_blockers_first() {
    init_tracing();

    // A reverted to TODO, B is still DONE, C is BLOCKED by B. Seeding C
    // ahead of its ancestors must not unblock it on B's stale DONE.
    let graph = GraphBuilder::new()
        .task(1, Todo)
        .task(2, Done)
        .task(3, Blocked)
        .blocked_by(2, 1)
        .blocked_by(3, 2)
        .build();

    let result = PropagationEngine::new().converge(&graph, [id(3), id(1), id(2)]);

    assert_eq!(state_of(&result.graph, 2), Blocked);
    assert_eq!(state_of(&result.graph, 3), Blocked);
    assert!(result.change_for(id(3)).is_none());
}

#[test]
fn engine_never_touches_edges_or_other_fields() {
    let graph = diamond(Todo, Todo);
    let result = PropagationEngine::new().converge_all(&graph);

    for task in graph.tasks() {
        let converged = result.graph.get(task.id).expect("task kept");
        assert_eq!(converged.blockers, task.blockers);
        assert_eq!(converged.dependents, task.dependents);
        assert_eq!(converged.title, task.title);
        assert_eq!(converged.updated_at, task.updated_at);
    }
}

#[test]
fn blocking_overrides_every_actionable_state() {
    let graph = GraphBuilder::new()
        .task(1, Todo)
        .task(2, Backlog)
        .task(3, InProgress)
        .task(4, Done)
        .blocked_by(2, 1)
        .blocked_by(3, 1)
        .blocked_by(4, 1)
        .build();

    let result = PropagationEngine::new().converge(&graph, [id(1)]);

    for n in 2..=4 {
        assert_eq!(state_of(&result.graph, n), Blocked, "task {n}");
    }
    assert_eq!(
        result.change_for(id(4)).map(|c| c.reason),
        Some(ChangeReason::Reblocked)
    );
    assert_eq!(
        result.change_for(id(3)).map(|c| c.reason),
        Some(ChangeReason::Blocked)
    );
}
