// src/store/mod.rs

//! System-of-record port.
//!
//! The authoritative task rows and dependency edges live behind
//! [`SystemOfRecord`]. The engine reads full snapshots through `list()` and
//! writes back only through the discrete calls below.
//!
//! - [`memory`] provides `InMemoryStore`, the adapter used by the CLI and by
//!   tests. It enforces the same rules a remote backend would.
//! - [`fixture`] seeds any store from a board file through the port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::graph::{IllegalTransition, Task};
use crate::types::{TaskId, TaskState};

pub mod fixture;
pub mod memory;

pub use fixture::{KeyMap, load_fixture};
pub use memory::InMemoryStore;

/// Result type for system-of-record calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Fields for a new task. The system of record assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// BACKLOG or TODO; `None` means TODO.
    pub state: Option<TaskState>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            state: None,
        }
    }
}

/// Partial update of a task. `None` leaves a field untouched.
///
/// `description` and `due_date` are doubly optional so they can be cleared
/// with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub state: Option<TaskState>,
}

impl TaskPatch {
    pub fn state(state: TaskState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.state.is_none()
    }
}

/// Task persistence contract consumed by the engine.
#[async_trait]
pub trait SystemOfRecord: Send + Sync {
    /// All tasks with full blocker and dependent id sets.
    async fn list(&self) -> StoreResult<Vec<Task>>;

    /// Create a task in BACKLOG or TODO.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidInitialState`] for any other initial state.
    async fn create(&self, new: NewTask) -> StoreResult<Task>;

    /// Apply a user-driven partial update.
    ///
    /// # Errors
    ///
    /// [`StoreError::IllegalTransition`] if `patch.state` violates the
    /// user-transition rule. Nothing is applied in that case.
    async fn patch(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;

    /// Delete a task and clean up every edge that references it.
    async fn delete(&self, id: TaskId) -> StoreResult<()>;

    /// Record that `task` is blocked by `blocker` (both directions).
    async fn add_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()>;

    /// Remove the `task` blocked-by `blocker` edge (both directions).
    async fn remove_edge(&self, task: TaskId, blocker: TaskId) -> StoreResult<()>;

    /// Persist a state derived by the propagation engine.
    ///
    /// Unlike [`SystemOfRecord::patch`], this bypasses the user-transition
    /// rule; it is the only way BLOCKED is ever written.
    async fn write_derived_state(&self, id: TaskId, state: TaskState) -> StoreResult<Task>;
}

/// Shared handle to a system of record.
pub type SharedStore = Arc<dyn SystemOfRecord>;

/// Errors returned by system-of-record implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    #[error("task cannot be created in state {0} (expected BACKLOG or TODO)")]
    InvalidInitialState(TaskState),

    #[error("task {0} cannot block itself")]
    SelfDependency(TaskId),

    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("system of record unavailable: {0}")]
    Unavailable(String),
}
