// src/engine/board.rs

use std::fmt;

use tracing::{debug, info};

use crate::errors::{BlockwiseError, Result};
use crate::graph::{PropagationEngine, Task, TaskGraph};
use crate::store::{NewTask, SharedStore};
use crate::sync::SyncCoordinator;
use crate::types::{TaskId, TaskState};

use super::core::plan_pass;
use super::{BoardOptions, EditTarget, Intent, PassReport};

/// Async shell around the propagation engine.
///
/// For every intent it:
/// 1. applies the mutation through the system of record (a failure aborts
///    the intent and leaves the local view untouched),
/// 2. re-fetches the full snapshot,
/// 3. converges it with the pure core,
/// 4. adopts the converged snapshot as the local view,
/// 5. writes the derived changes back via the sync coordinator.
///
/// The local view is kept even when some writes in step 5 fail; the next
/// refresh reconciles it with the system of record.
pub struct Board {
    store: SharedStore,
    engine: PropagationEngine,
    sync: SyncCoordinator,
    options: BoardOptions,
    view: TaskGraph,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("options", &self.options)
            .field("tasks", &self.view.len())
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Create a board over a store. The view stays empty until the first
    /// intent (usually [`Board::refresh`]).
    pub fn new(store: SharedStore, options: BoardOptions) -> Self {
        let sync = SyncCoordinator::new(store.clone(), options.sync_concurrency);
        Self {
            store,
            engine: PropagationEngine::new(),
            sync,
            options,
            view: TaskGraph::default(),
        }
    }

    /// Latest converged snapshot.
    pub fn view(&self) -> &TaskGraph {
        &self.view
    }

    pub fn task(&self, id: TaskId) -> Result<&Task> {
        self.view.get(id).ok_or(BlockwiseError::TaskNotFound(id))
    }

    /// Tasks in the given state, ordered by id.
    pub fn tasks_in_state(&self, state: TaskState) -> Vec<&Task> {
        self.view.tasks().filter(|t| t.state == state).collect()
    }

    pub fn options(&self) -> BoardOptions {
        self.options
    }

    pub async fn refresh(&mut self) -> Result<PassReport> {
        self.apply(Intent::Refresh).await
    }

    pub async fn create(&mut self, new: NewTask) -> Result<PassReport> {
        self.apply(Intent::Create(new)).await
    }

    pub async fn set_state(&mut self, id: TaskId, state: TaskState) -> Result<PassReport> {
        self.apply(Intent::set_state(id, state)).await
    }

    pub async fn add_blocker(&mut self, task: TaskId, blocker: TaskId) -> Result<PassReport> {
        self.apply(Intent::AddEdge { task, blocker }).await
    }

    pub async fn remove_blocker(&mut self, task: TaskId, blocker: TaskId) -> Result<PassReport> {
        self.apply(Intent::RemoveEdge { task, blocker }).await
    }

    pub async fn delete(&mut self, id: TaskId) -> Result<PassReport> {
        self.apply(Intent::Delete { id }).await
    }

    /// Run one full pass for `intent`.
    pub async fn apply(&mut self, intent: Intent) -> Result<PassReport> {
        debug!(?intent, "applying intent");
        let (target, task) = self.mutate(intent).await?;

        // Edges are server-managed; always re-fetch after a mutation.
        let snapshot = TaskGraph::from_tasks(self.store.list().await?);

        let convergence = plan_pass(
            &self.engine,
            &snapshot,
            target,
            self.options.deletion_reseed,
        );

        // Converged view is adopted before any write-back happens.
        self.view = convergence.graph;
        let task = task.map(|t| self.view.get(t.id).cloned().unwrap_or(t));

        let sync = self.sync.dispatch(&convergence.changes).await;

        info!(
            edit = ?target,
            changes = convergence.changes.len(),
            visited = convergence.visited,
            sync_failed = sync.failed.len(),
            "pass complete"
        );

        Ok(PassReport {
            target,
            task,
            changes: convergence.changes,
            visited: convergence.visited,
            sync,
        })
    }

    async fn mutate(&self, intent: Intent) -> Result<(EditTarget, Option<Task>)> {
        let store = &self.store;
        let applied = match intent {
            Intent::Refresh => (EditTarget::Everything, None),
            Intent::Create(new) => {
                let task = store.create(new).await?;
                (EditTarget::Task(task.id), Some(task))
            }
            Intent::Patch { id, patch } => {
                let task = store.patch(id, patch).await?;
                (EditTarget::Task(id), Some(task))
            }
            Intent::AddEdge { task, blocker } => {
                store.add_edge(task, blocker).await?;
                (EditTarget::Task(task), None)
            }
            Intent::RemoveEdge { task, blocker } => {
                store.remove_edge(task, blocker).await?;
                (EditTarget::Task(task), None)
            }
            Intent::Delete { id } => {
                store.delete(id).await?;
                (EditTarget::Deletion(id), None)
            }
        };
        Ok(applied)
    }
}
