// src/graph/mod.rs

//! Task graph representation and state propagation.
//!
//! - [`task`] holds the task row and the user-transition rule.
//! - [`graph`] holds the id-indexed snapshot with both adjacency directions.
//! - [`evaluator`] derives the desired state of a single task.
//! - [`propagation`] contains the worklist engine that converges a snapshot.
//! - [`convergence`] defines the result type of one pass.

pub mod convergence;
pub mod evaluator;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod propagation;
pub mod task;

pub use convergence::{Convergence, StateChange};
pub use evaluator::{ChangeReason, evaluate, evaluate_with_reason, is_blocked};
pub use graph::TaskGraph;
pub use propagation::PropagationEngine;
pub use task::{IllegalTransition, Task};
