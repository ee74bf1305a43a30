// src/config/validate.rs

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{BoardFile, RawBoardFile};
use crate::errors::{BlockwiseError, Result};
use crate::types::TaskState;

impl TryFrom<RawBoardFile> for BoardFile {
    type Error = BlockwiseError;

    fn try_from(raw: RawBoardFile) -> std::result::Result<Self, Self::Error> {
        validate_board(&raw)?;
        Ok(BoardFile::new_unchecked(raw.config, raw.task))
    }
}

/// Validate a raw board without consuming it.
pub fn validate_board(board: &RawBoardFile) -> Result<()> {
    validate_global_config(board)?;
    validate_tasks(board)?;
    warn_on_cycles(board);
    Ok(())
}

fn validate_global_config(board: &RawBoardFile) -> Result<()> {
    if board.config.sync_concurrency == 0 {
        return Err(BlockwiseError::ConfigError(
            "[config].sync_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_tasks(board: &RawBoardFile) -> Result<()> {
    for (key, task) in board.task.iter() {
        if task.title.trim().is_empty() {
            return Err(BlockwiseError::ConfigError(format!(
                "task '{key}' has an empty title"
            )));
        }
        if task.state == Some(TaskState::Blocked) {
            return Err(BlockwiseError::ConfigError(format!(
                "task '{key}' cannot start BLOCKED; blocked state is derived from `after`"
            )));
        }
        for dep in task.after.iter() {
            if dep == key {
                return Err(BlockwiseError::ConfigError(format!(
                    "task '{key}' cannot depend on itself in `after`"
                )));
            }
            if !board.task.contains_key(dep) {
                return Err(BlockwiseError::ConfigError(format!(
                    "task '{key}' has unknown dependency '{dep}' in `after`"
                )));
            }
        }
    }
    Ok(())
}

/// Blocker cycles are legal but leave their members permanently BLOCKED,
/// so surface them at load time.
fn warn_on_cycles(board: &RawBoardFile) {
    // Edge direction: blocker -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for key in board.task.keys() {
        graph.add_node(key.as_str());
    }
    for (key, task) in board.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), key.as_str(), ());
        }
    }

    for scc in tarjan_scc(&graph) {
        if scc.len() > 1 {
            warn!(
                tasks = ?scc,
                "blocker cycle in board; these tasks will stay BLOCKED"
            );
        }
    }
}
