// src/config/model.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{DeletionReseed, TaskState};

/// Board file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// sync_concurrency = 8
/// deletion_reseed = "blocked"
///
/// [task.design]
/// title = "Design"
/// state = "done"
///
/// [task.build]
/// title = "Build"
/// after = ["design"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawBoardFile {
    /// Engine behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Fixture tasks from `[task.<key>]`.
    ///
    /// Keys are board-local names used only to wire up `after` references;
    /// the system of record assigns the real ids when the board is loaded.
    #[serde(default)]
    pub task: BTreeMap<String, TaskSpec>,
}

/// Validated board file. Only obtainable through `TryFrom<RawBoardFile>`.
#[derive(Debug, Clone)]
pub struct BoardFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskSpec>,
}

impl BoardFile {
    pub(crate) fn new_unchecked(config: ConfigSection, task: BTreeMap<String, TaskSpec>) -> Self {
        Self { config, task }
    }

    /// An empty board with default settings.
    pub fn empty() -> Self {
        Self::new_unchecked(ConfigSection::default(), BTreeMap::new())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Maximum number of derived-state writes in flight during a sync phase.
    #[serde(default = "default_sync_concurrency")]
    pub sync_concurrency: usize,

    /// Which tasks to re-evaluate after a deletion: `"blocked"` (default) or
    /// `"all"`.
    #[serde(default)]
    pub deletion_reseed: DeletionReseed,
}

fn default_sync_concurrency() -> usize {
    8
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            sync_concurrency: default_sync_concurrency(),
            deletion_reseed: DeletionReseed::default(),
        }
    }
}

/// `[task.<key>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Due date as `YYYY-MM-DD`.
    #[serde(default)]
    pub due: Option<NaiveDate>,

    /// Initial state; defaults to TODO. BLOCKED is derived and rejected here.
    #[serde(default)]
    pub state: Option<TaskState>,

    /// Blockers of this task, by board key.
    #[serde(default)]
    pub after: Vec<String>,
}

impl TaskSpec {
    pub fn effective_state(&self) -> TaskState {
        self.state.unwrap_or(TaskState::Todo)
    }
}
