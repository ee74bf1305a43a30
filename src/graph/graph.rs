// src/graph/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::graph::task::Task;
use crate::types::{TaskId, TaskState};

static NO_IDS: BTreeSet<TaskId> = BTreeSet::new();

/// Id-indexed snapshot of every task and its blocker/dependent edges.
///
/// Rebuilt from a full `list()` before each convergence pass. The graph
/// trusts the system of record for edge consistency: a blocker id with no
/// matching task is kept as-is and simply resolves to `None` on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGraph {
    tasks: BTreeMap<TaskId, Task>,
}

impl TaskGraph {
    /// Build a graph from a full snapshot fetch.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
        Self { tasks }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Ids this task waits on, including ids of tasks that no longer exist.
    pub fn blockers_of(&self, id: TaskId) -> &BTreeSet<TaskId> {
        self.tasks.get(&id).map(|t| &t.blockers).unwrap_or(&NO_IDS)
    }

    /// Ids of tasks that wait on this one.
    pub fn dependents_of(&self, id: TaskId) -> &BTreeSet<TaskId> {
        self.tasks.get(&id).map(|t| &t.dependents).unwrap_or(&NO_IDS)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.keys().copied()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn ids_in_state(&self, state: TaskState) -> Vec<TaskId> {
        self.tasks
            .values()
            .filter(|t| t.state == state)
            .map(|t| t.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Overwrite the state of a task on a working copy.
    ///
    /// Only the propagation engine calls this, and only on its private copy.
    pub(crate) fn set_state(&mut self, id: TaskId, state: TaskState) -> bool {
        match self.tasks.get_mut(&id) {
            Some(task) => {
                task.state = state;
                true
            }
            None => false,
        }
    }

    /// Position of every task in a blockers-first topological order, or
    /// `None` if the graph has a blocker cycle.
    pub fn topological_rank(&self) -> Option<HashMap<TaskId, usize>> {
        let g = self.petgraph();
        let order = toposort(&g, None).ok()?;
        Some(order.into_iter().enumerate().map(|(i, id)| (id, i)).collect())
    }

    /// Every blocker cycle in the graph, each as a sorted list of task ids.
    ///
    /// Edges to absent tasks are ignored. A task listing itself as a blocker
    /// is reported as a cycle of one.
    pub fn blocker_cycles(&self) -> Vec<Vec<TaskId>> {
        let g = self.petgraph();

        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&g)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => g.contains_edge(*single, *single),
                _ => true,
            })
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Edge direction: blocker -> dependent. Dangling blocker ids are dropped.
    fn petgraph(&self) -> DiGraphMap<TaskId, ()> {
        let mut g: DiGraphMap<TaskId, ()> = DiGraphMap::new();

        for id in self.tasks.keys() {
            g.add_node(*id);
        }
        for task in self.tasks.values() {
            for blocker in &task.blockers {
                if self.tasks.contains_key(blocker) {
                    g.add_edge(*blocker, task.id, ());
                }
            }
        }

        g
    }
}
