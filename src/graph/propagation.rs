// src/graph/propagation.rs

//! Breadth-first worklist that converges derived task states.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, trace};

use crate::graph::convergence::{Convergence, StateChange};
use crate::graph::evaluator::evaluate_with_reason;
use crate::graph::graph::TaskGraph;
use crate::types::TaskId;

/// Runs convergence passes over a private copy of a [`TaskGraph`].
///
/// The engine never touches edges and never talks to the system of record;
/// it only decides which states must change.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagationEngine;

impl PropagationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Converge every task reachable (through dependents) from `seeds`.
    ///
    /// - Each id is evaluated at most once, so the pass is O(V + E) and
    ///   terminates on blocker cycles.
    /// - Dependents are enqueued whether or not the visited task changed, so
    ///   a dependent always sees its upstream neighbour's current state at
    ///   least once per pass.
    /// - Seed ids that are absent from the graph are skipped.
    /// - With more than one seed on an acyclic graph, seeds are queued
    ///   blockers-first so a seed is never evaluated before a seeded
    ///   ancestor.
    pub fn converge<I>(&self, graph: &TaskGraph, seeds: I) -> Convergence
    where
        I: IntoIterator<Item = TaskId>,
    {
        let mut working = graph.clone();
        let mut queue: VecDeque<TaskId> = order_seeds(graph, seeds.into_iter().collect()).into();
        let mut visited: HashSet<TaskId> = HashSet::with_capacity(queue.len());
        let mut changes: Vec<StateChange> = Vec::new();
        let mut evaluated = 0usize;

        debug!(seeds = queue.len(), tasks = graph.len(), "starting convergence pass");

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }

            let Some(task) = working.get(id) else {
                trace!(task = %id, "seed or dependent not in snapshot; skipping");
                continue;
            };
            evaluated += 1;

            if let Some((desired, reason)) = evaluate_with_reason(task, &working) {
                let from = task.state;
                working.set_state(id, desired);
                debug!(task = %id, %from, to = %desired, ?reason, "derived state change");
                changes.push(StateChange {
                    id,
                    from,
                    to: desired,
                    reason,
                });
            }

            for dependent in working.dependents_of(id) {
                if !visited.contains(dependent) {
                    queue.push_back(*dependent);
                }
            }
        }

        info!(
            evaluated,
            changed = changes.len(),
            "convergence pass finished"
        );

        Convergence {
            graph: working,
            changes,
            visited: evaluated,
        }
    }

    /// Converge the whole graph (global refresh).
    pub fn converge_all(&self, graph: &TaskGraph) -> Convergence {
        let seeds: Vec<TaskId> = graph.ids().collect();
        self.converge(graph, seeds)
    }
}

fn order_seeds(graph: &TaskGraph, mut seeds: Vec<TaskId>) -> Vec<TaskId> {
    if seeds.len() < 2 {
        return seeds;
    }

    match graph.topological_rank() {
        Some(rank) => {
            seeds.sort_by_key(|id| rank.get(id).copied().unwrap_or(usize::MAX));
        }
        None => {
            debug!("blocker cycle present; keeping seed order as given");
        }
    }
    seeds
}
