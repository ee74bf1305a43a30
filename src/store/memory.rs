// src/store/memory.rs

//! In-memory system of record.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::graph::Task;
use crate::store::{NewTask, StoreError, StoreResult, SystemOfRecord, TaskPatch};
use crate::types::{TaskId, TaskState};

/// Thread-safe in-memory task store.
///
/// Ids are assigned from a counter starting at 1 and never reused. Edges are
/// kept as mutual inverses: every write touches both `blockers` and
/// `dependents`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl StoreState {
    fn task_mut(&mut self, id: TaskId) -> StoreResult<&mut Task> {
        self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))
    }

    fn ensure_exists(&self, id: TaskId) -> StoreResult<()> {
        if self.tasks.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }
}

#[async_trait]
impl SystemOfRecord for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn create(&self, new: NewTask) -> StoreResult<Task> {
        let initial = new.state.unwrap_or(TaskState::Todo);
        if !matches!(initial, TaskState::Backlog | TaskState::Todo) {
            return Err(StoreError::InvalidInitialState(initial));
        }
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let mut state = self.write()?;
        state.last_id += 1;
        let id = TaskId(state.last_id);
        let now = Utc::now();

        let task = Task {
            id,
            title,
            description: new.description,
            due_date: new.due_date,
            state: initial,
            blockers: BTreeSet::new(),
            dependents: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(id, task.clone());

        debug!(task = %id, state = %initial, "store: created task");
        Ok(task)
    }

    async fn patch(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let mut state = self.write()?;
        let task = state.task_mut(id)?;

        // Validate everything before touching the row.
        if let Some(target) = patch.state {
            task.check_user_transition(target)?;
        }
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(StoreError::EmptyTitle);
            }
        }

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(target) = patch.state {
            task.state = target;
        }
        task.updated_at = Utc::now();

        debug!(task = %id, state = %task.state, "store: patched task");
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let mut state = self.write()?;
        let removed = state.tasks.remove(&id).ok_or(StoreError::NotFound(id))?;

        for blocker in &removed.blockers {
            if let Some(t) = state.tasks.get_mut(blocker) {
                t.dependents.remove(&id);
            }
        }
        for dependent in &removed.dependents {
            if let Some(t) = state.tasks.get_mut(dependent) {
                t.blockers.remove(&id);
            }
        }

        debug!(
            task = %id,
            blockers = removed.blockers.len(),
            dependents = removed.dependents.len(),
            "store: deleted task and cleaned up edges"
        );
        Ok(())
    }

    async fn add_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()> {
        if task == blocker {
            return Err(StoreError::SelfDependency(task));
        }

        let mut state = self.write()?;
        state.ensure_exists(task)?;
        state.ensure_exists(blocker)?;

        let now = Utc::now();
        let t = state.task_mut(task)?;
        t.blockers.insert(blocker);
        t.updated_at = now;
        let b = state.task_mut(blocker)?;
        b.dependents.insert(task);
        b.updated_at = now;

        debug!(task = %task, blocker = %blocker, "store: added edge");
        Ok(())
    }

    async fn remove_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(task)?;

        let now = Utc::now();
        let t = state.task_mut(task)?;
        if t.blockers.remove(&blocker) {
            t.updated_at = now;
        }
        // The blocker side may already be gone; that is not an error.
        if let Some(b) = state.tasks.get_mut(&blocker) {
            b.dependents.remove(&task);
        }

        debug!(task = %task, blocker = %blocker, "store: removed edge");
        Ok(())
    }

    async fn write_derived_state(&self, id: TaskId, target: TaskState) -> StoreResult<Task> {
        let mut state = self.write()?;
        let task = state.task_mut(id)?;
        task.state = target;
        task.updated_at = Utc::now();

        debug!(task = %id, state = %target, "store: wrote derived state");
        Ok(task.clone())
    }
}
