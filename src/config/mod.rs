// src/config/mod.rs

//! Board file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a board file from disk (`loader.rs`).
//! - Validate references, titles and `[config]` values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_board_path, load_and_validate, load_from_path, parse_str};
pub use model::{BoardFile, ConfigSection, RawBoardFile, TaskSpec};
pub use validate::validate_board;
