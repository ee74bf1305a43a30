// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::types::TaskState;

/// Command-line arguments for `blockwise`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "blockwise",
    version,
    about = "Converge task states across blocker dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the board file (TOML).
    ///
    /// Default: `Blockwise.toml` in the current working directory, or
    /// `BLOCKWISE_BOARD` if set.
    #[arg(long, value_name = "PATH")]
    pub board: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BLOCKWISE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the converged board as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// One intent per invocation.
///
/// Tasks are referenced by board key (`design`) or by id (`3` / `#3`).
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Converge the whole board and print it.
    Show {
        /// Only list tasks in this state.
        #[arg(long, value_parser = parse_state)]
        state: Option<TaskState>,
    },
    /// Create a task.
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date, `YYYY-MM-DD`.
        #[arg(long, value_name = "DATE")]
        due: Option<NaiveDate>,
        /// Create in BACKLOG instead of TODO.
        #[arg(long)]
        backlog: bool,
    },
    /// Move a task to todo, in-progress or done.
    SetState {
        task: String,
        #[arg(value_parser = parse_state)]
        state: TaskState,
    },
    /// Make TASK wait on BLOCKER.
    Block {
        task: String,
        #[arg(long = "by", value_name = "BLOCKER")]
        blocker: String,
    },
    /// Remove the TASK blocked-by BLOCKER edge.
    Unblock {
        task: String,
        #[arg(long = "by", value_name = "BLOCKER")]
        blocker: String,
    },
    /// Delete a task.
    Delete { task: String },
    /// List blocker cycles (tasks that can never leave BLOCKED).
    Cycles,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_state(s: &str) -> Result<TaskState, String> {
    s.parse()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
