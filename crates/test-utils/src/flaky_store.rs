use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blockwise::graph::Task;
use blockwise::store::{
    InMemoryStore, NewTask, StoreError, StoreResult, SystemOfRecord, TaskPatch,
};
use blockwise::types::{TaskId, TaskState};

/// A system of record that:
/// - delegates everything to an `InMemoryStore`
/// - records every `write_derived_state` call
/// - fails `write_derived_state` for the ids in its failure set.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    failing: Arc<Mutex<BTreeSet<TaskId>>>,
    writes: Arc<Mutex<Vec<(TaskId, TaskState)>>>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            failing: Arc::default(),
            writes: Arc::default(),
        }
    }

    /// The wrapped store, for inspecting what actually got persisted.
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn fail_writes_for(&self, id: TaskId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Every derived-state write attempted so far, failed ones included.
    pub fn writes(&self) -> Vec<(TaskId, TaskState)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn writes_for(&self, id: TaskId) -> Vec<TaskState> {
        self.writes()
            .into_iter()
            .filter(|(w, _)| *w == id)
            .map(|(_, s)| s)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

#[async_trait]
impl SystemOfRecord for FlakyStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        self.inner.list().await
    }

    async fn create(&self, new: NewTask) -> StoreResult<Task> {
        self.inner.create(new).await
    }

    async fn patch(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.inner.patch(id, patch).await
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.inner.delete(id).await
    }

    async fn add_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()> {
        self.inner.add_edge(task, blocker).await
    }

    async fn remove_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()> {
        self.inner.remove_edge(task, blocker).await
    }

    async fn write_derived_state(&self, id: TaskId, state: TaskState) -> StoreResult<Task> {
        self.writes.lock().unwrap().push((id, state));

        let fails = self.failing.lock().unwrap().contains(&id);
        if fails {
            return Err(StoreError::Unavailable(format!("injected failure for {id}")));
        }
        self.inner.write_derived_state(id, state).await
    }
}
