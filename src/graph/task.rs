// src/graph/task.rs

//! Task rows as delivered by the system of record.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TaskId, TaskState};

/// A user-driven state change that the transition rule forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal transition for task {id}: {from} -> {to}")]
pub struct IllegalTransition {
    pub id: TaskId,
    pub from: TaskState,
    pub to: TaskState,
}

/// A single task plus both directions of its dependency adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub state: TaskState,
    /// Tasks this one waits on.
    #[serde(default)]
    pub blockers: BTreeSet<TaskId>,
    /// Tasks waiting on this one (reverse of `blockers`).
    #[serde(default)]
    pub dependents: BTreeSet<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Check that a user may move this task to `target`.
    ///
    /// The target must be TODO, IN_PROGRESS or DONE and the task must not be
    /// BLOCKED. A BACKLOG task may be promoted into any of the three.
    pub fn check_user_transition(&self, target: TaskState) -> Result<(), IllegalTransition> {
        if self.state == TaskState::Blocked || !target.is_user_settable() {
            return Err(IllegalTransition {
                id: self.id,
                from: self.state,
                to: target,
            });
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.state == TaskState::Done
    }
}
