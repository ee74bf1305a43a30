// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{BoardFile, RawBoardFile};
use crate::errors::Result;

/// Load a board file from a given path and return the raw `RawBoardFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBoardFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse board TOML from a string.
pub fn parse_str(contents: &str) -> Result<RawBoardFile> {
    let board: RawBoardFile = toml::from_str(contents)?;
    Ok(board)
}

/// Load a board file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown `after` references and self-dependencies,
///   - empty titles and fixture tasks declared BLOCKED,
///   - basic `[config]` sanity.
///
/// Blocker cycles are accepted (and logged); the engine tolerates them.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BoardFile> {
    let raw = load_from_path(&path)?;
    let board = BoardFile::try_from(raw)?;
    Ok(board)
}

/// `Blockwise.toml` in the current working directory, unless
/// `BLOCKWISE_BOARD` names another file.
pub fn default_board_path() -> PathBuf {
    std::env::var_os("BLOCKWISE_BOARD")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Blockwise.toml"))
}
