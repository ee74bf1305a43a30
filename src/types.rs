// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a task by the system of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{}", self.0))
    }
}

impl FromStr for TaskId {
    type Err = String;

    /// Accepts both `12` and `#12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| format!("invalid task id: {s} (expected a positive integer)"))
    }
}

/// Lifecycle state of a task.
///
/// `Blocked` is derived: only the propagation engine sets or clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    #[serde(alias = "backlog")]
    Backlog,
    #[serde(alias = "todo")]
    Todo,
    #[serde(alias = "in_progress", alias = "in-progress")]
    InProgress,
    #[serde(alias = "done")]
    Done,
    #[serde(alias = "blocked")]
    Blocked,
}

impl TaskState {
    /// Canonical upper-case name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Backlog => "BACKLOG",
            TaskState::Todo => "TODO",
            TaskState::InProgress => "IN_PROGRESS",
            TaskState::Done => "DONE",
            TaskState::Blocked => "BLOCKED",
        }
    }

    /// States a user may move a task into (and out of).
    pub fn is_user_settable(self) -> bool {
        matches!(
            self,
            TaskState::Todo | TaskState::InProgress | TaskState::Done
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "backlog" => Ok(TaskState::Backlog),
            "todo" | "to_do" => Ok(TaskState::Todo),
            "in_progress" | "inprogress" => Ok(TaskState::InProgress),
            "done" => Ok(TaskState::Done),
            "blocked" => Ok(TaskState::Blocked),
            _ => Err(format!(
                "invalid task state: {s} (expected backlog, todo, in_progress, done or blocked)"
            )),
        }
    }
}

/// Which tasks to re-evaluate after a deletion.
///
/// Edge cleanup belongs to the system of record, so the engine cannot know
/// which tasks lost a blocker. `Blocked` re-seeds every currently BLOCKED
/// task; `All` re-seeds the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletionReseed {
    #[default]
    Blocked,
    All,
}
