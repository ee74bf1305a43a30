// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod store;
pub mod sync;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::BoardFile;
use crate::config::loader::{default_board_path, load_and_validate};
use crate::engine::{Board, BoardOptions, PassReport};
use crate::graph::{StateChange, Task};
use crate::store::{InMemoryStore, KeyMap, NewTask, load_fixture};
use crate::types::{TaskId, TaskState};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - board file loading
/// - the in-memory system of record, seeded from the board
/// - an initial full convergence pass
/// - the requested intent and its pass
/// - rendering of the converged board
pub async fn run(args: CliArgs) -> Result<()> {
    let board_path = args.board.clone().unwrap_or_else(default_board_path);
    let board_file = load_board(&board_path)?;

    let options = BoardOptions {
        sync_concurrency: board_file.config.sync_concurrency,
        deletion_reseed: board_file.config.deletion_reseed,
    };

    let store = InMemoryStore::new();
    let keys = load_fixture(&store, &board_file).await?;
    let mut board = Board::new(Arc::new(store), options);

    let initial = board.refresh().await?;
    debug!(changes = initial.changes.len(), "initial convergence done");

    let report = match &args.command {
        Command::Show { .. } | Command::Cycles => None,
        Command::Create {
            title,
            description,
            due,
            backlog,
        } => {
            let new = NewTask {
                title: title.clone(),
                description: description.clone(),
                due_date: *due,
                state: Some(if *backlog {
                    TaskState::Backlog
                } else {
                    TaskState::Todo
                }),
            };
            Some(board.create(new).await?)
        }
        Command::SetState { task, state } => {
            let id = resolve(&keys, task)?;
            Some(board.set_state(id, *state).await?)
        }
        Command::Block { task, blocker } => {
            let (id, by) = (resolve(&keys, task)?, resolve(&keys, blocker)?);
            Some(board.add_blocker(id, by).await?)
        }
        Command::Unblock { task, blocker } => {
            let (id, by) = (resolve(&keys, task)?, resolve(&keys, blocker)?);
            Some(board.remove_blocker(id, by).await?)
        }
        Command::Delete { task } => {
            let id = resolve(&keys, task)?;
            Some(board.delete(id).await?)
        }
    };

    if let Some(report) = &report {
        info!(
            target_task = ?report.target,
            changes = report.changes.len(),
            "intent applied"
        );
    }

    match &args.command {
        Command::Cycles => print_cycles(&board, &keys, args.json)?,
        Command::Show { state: Some(state) } => {
            let tasks = board.tasks_in_state(*state);
            print_tasks(&tasks, &keys, report.as_ref(), args.json)?;
        }
        _ => {
            let tasks: Vec<&Task> = board.view().tasks().collect();
            print_tasks(&tasks, &keys, report.as_ref(), args.json)?;
        }
    }

    Ok(())
}

/// Load the board at `path`. A missing default board is treated as empty so
/// `create` works without any file.
fn load_board(path: &Path) -> Result<BoardFile> {
    if !path.exists() && path == default_board_path().as_path() {
        debug!(path = %path.display(), "no board file; starting empty");
        return Ok(BoardFile::empty());
    }
    load_and_validate(path).with_context(|| format!("loading board {}", path.display()))
}

/// Resolve a board key or a numeric id.
fn resolve(keys: &KeyMap, reference: &str) -> Result<TaskId> {
    if let Some(id) = keys.get(reference) {
        return Ok(*id);
    }
    reference
        .parse::<TaskId>()
        .map_err(|_| anyhow!("unknown task '{reference}' (not a board key or id)"))
}

fn key_of(keys: &KeyMap, id: TaskId) -> Option<&str> {
    keys.iter()
        .find(|(_, v)| **v == id)
        .map(|(k, _)| k.as_str())
}

#[derive(Serialize)]
struct Rendered<'a> {
    tasks: Vec<RenderedTask<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changes: Vec<StateChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sync_failures: Vec<TaskId>,
}

#[derive(Serialize)]
struct RenderedTask<'a> {
    key: Option<&'a str>,
    #[serde(flatten)]
    task: &'a Task,
}

fn print_tasks(
    tasks: &[&Task],
    keys: &KeyMap,
    report: Option<&PassReport>,
    json: bool,
) -> Result<()> {
    if json {
        let rendered = Rendered {
            tasks: tasks
                .iter()
                .map(|t| RenderedTask {
                    key: key_of(keys, t.id),
                    task: t,
                })
                .collect(),
            changes: report.map(|r| r.changes.clone()).unwrap_or_default(),
            sync_failures: report.map(|r| r.sync.failed_ids()).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    println!("tasks ({}):", tasks.len());
    for task in tasks {
        match key_of(keys, task.id) {
            Some(key) => println!("  {:>5}  {:<12} {} [{key}]", task.id, task.state, task.title),
            None => println!("  {:>5}  {:<12} {}", task.id, task.state, task.title),
        }
        if !task.blockers.is_empty() {
            let ids: Vec<String> = task.blockers.iter().map(|b| b.to_string()).collect();
            println!("           blocked by: {}", ids.join(", "));
        }
        if let Some(due) = task.due_date {
            println!("           due: {due}");
        }
    }

    if let Some(report) = report {
        if !report.changes.is_empty() {
            println!();
            println!("changes ({}):", report.changes.len());
            for change in &report.changes {
                println!(
                    "  {:>5}  {} -> {} ({:?})",
                    change.id, change.from, change.to, change.reason
                );
            }
        }
        if !report.fully_synced() {
            println!();
            println!("sync failures:");
            for (change, error) in &report.sync.failed {
                println!("  {:>5}  {error}", change.id);
            }
        }
    }

    Ok(())
}

fn print_cycles(board: &Board, keys: &KeyMap, json: bool) -> Result<()> {
    let cycles = board.view().blocker_cycles();

    if json {
        println!("{}", serde_json::to_string_pretty(&cycles)?);
        return Ok(());
    }

    if cycles.is_empty() {
        println!("no blocker cycles");
        return Ok(());
    }

    println!("blocker cycles ({}):", cycles.len());
    for cycle in cycles {
        let names: Vec<String> = cycle
            .iter()
            .map(|id| match key_of(keys, *id) {
                Some(key) => format!("{id} [{key}]"),
                None => id.to_string(),
            })
            .collect();
        println!("  - {}", names.join(" <-> "));
    }
    Ok(())
}
