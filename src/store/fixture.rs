// src/store/fixture.rs

//! Seeding a system of record from a validated board file.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::BoardFile;
use crate::errors::Result;
use crate::store::{NewTask, SystemOfRecord, TaskPatch};
use crate::types::{TaskId, TaskState};

/// Board keys mapped to the ids the system of record assigned.
pub type KeyMap = BTreeMap<String, TaskId>;

/// Create every fixture task, apply its initial state, then add its edges.
///
/// Only regular port calls are used, so the store's own rules apply. States
/// are set before any edge exists; the first convergence pass derives
/// BLOCKED from there.
pub async fn load_fixture(store: &dyn SystemOfRecord, board: &BoardFile) -> Result<KeyMap> {
    let mut keys = KeyMap::new();

    for (key, spec) in board.task.iter() {
        let initial = match spec.effective_state() {
            TaskState::Backlog => TaskState::Backlog,
            _ => TaskState::Todo,
        };
        let task = store
            .create(NewTask {
                title: spec.title.clone(),
                description: spec.description.clone(),
                due_date: spec.due,
                state: Some(initial),
            })
            .await?;

        let wanted = spec.effective_state();
        if wanted != initial {
            store.patch(task.id, TaskPatch::state(wanted)).await?;
        }

        debug!(key = %key, task = %task.id, state = %wanted, "fixture task created");
        keys.insert(key.clone(), task.id);
    }

    let mut edges = 0usize;
    for (key, spec) in board.task.iter() {
        let Some(task) = keys.get(key).copied() else {
            continue;
        };
        for dep in spec.after.iter() {
            if let Some(blocker) = keys.get(dep).copied() {
                store.add_edge(task, blocker).await?;
                edges += 1;
            }
        }
    }

    info!(tasks = keys.len(), edges, "board fixture loaded");
    Ok(keys)
}
