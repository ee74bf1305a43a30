#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use blockwise::config::{BoardFile, ConfigSection, RawBoardFile, TaskSpec};
use blockwise::graph::{Task, TaskGraph};
use blockwise::types::{DeletionReseed, TaskId, TaskState};
use chrono::Utc;

/// Builder for `BoardFile` to simplify test setup.
pub struct BoardFileBuilder {
    board: RawBoardFile,
}

impl BoardFileBuilder {
    pub fn new() -> Self {
        Self {
            board: RawBoardFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, key: &str, task: TaskSpec) -> Self {
        self.board.task.insert(key.to_string(), task);
        self
    }

    pub fn sync_concurrency(mut self, n: usize) -> Self {
        self.board.config.sync_concurrency = n;
        self
    }

    pub fn deletion_reseed(mut self, reseed: DeletionReseed) -> Self {
        self.board.config.deletion_reseed = reseed;
        self
    }

    pub fn raw(self) -> RawBoardFile {
        self.board
    }

    pub fn build(self) -> BoardFile {
        BoardFile::try_from(self.board).expect("Failed to build valid board from builder")
    }
}

impl Default for BoardFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskSpec`.
pub struct TaskSpecBuilder {
    task: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            task: TaskSpec {
                title: title.to_string(),
                description: None,
                due: None,
                state: None,
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn state(mut self, state: TaskState) -> Self {
        self.task.state = Some(state);
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.task.description = Some(text.to_string());
        self
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}

/// Builds a `TaskGraph` directly, bypassing any store.
///
/// States are taken as given, so a test can start from a snapshot that is
/// not yet converged. Edges are recorded in both directions; a blocker id
/// that was never added as a task stays dangling.
pub struct GraphBuilder {
    tasks: BTreeMap<TaskId, Task>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
        }
    }

    pub fn task(mut self, id: u64, state: TaskState) -> Self {
        let now = Utc::now();
        self.tasks.insert(
            TaskId(id),
            Task {
                id: TaskId(id),
                title: format!("task {id}"),
                description: None,
                due_date: None,
                state,
                blockers: BTreeSet::new(),
                dependents: BTreeSet::new(),
                created_at: now,
                updated_at: now,
            },
        );
        self
    }

    /// `task` is blocked by `blocker`.
    pub fn blocked_by(mut self, task: u64, blocker: u64) -> Self {
        if let Some(t) = self.tasks.get_mut(&TaskId(task)) {
            t.blockers.insert(TaskId(blocker));
        }
        if let Some(b) = self.tasks.get_mut(&TaskId(blocker)) {
            b.dependents.insert(TaskId(task));
        }
        self
    }

    pub fn build(self) -> TaskGraph {
        TaskGraph::from_tasks(self.tasks.into_values())
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
