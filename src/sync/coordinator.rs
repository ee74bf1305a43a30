// src/sync/coordinator.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};

use crate::graph::StateChange;
use crate::store::{SharedStore, StoreError};
use crate::types::TaskId;

/// Result of writing one derived state back to the system of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied(StateChange),
    Failed { change: StateChange, error: String },
}

/// Collected outcomes of one sync phase.
///
/// The order of entries reflects completion order, not dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: Vec<StateChange>,
    pub failed: Vec<(StateChange, String)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.applied.len() + self.failed.len()
    }

    pub fn failed_ids(&self) -> Vec<TaskId> {
        self.failed.iter().map(|(c, _)| c.id).collect()
    }

    fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Applied(change) => self.applied.push(change),
            SyncOutcome::Failed { change, error } => self.failed.push((change, error)),
        }
    }
}

/// Writes converged state changes back to the system of record.
///
/// Every change is an independent unit on a `JoinSet`, at most
/// `max_in_flight` at a time. A failed unit never cancels or rolls back its
/// siblings, and nothing is retried.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: SharedStore,
    limit: Arc<Semaphore>,
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("available_permits", &self.limit.available_permits())
            .finish_non_exhaustive()
    }
}

impl SyncCoordinator {
    /// `max_in_flight` is clamped to at least 1.
    pub fn new(store: SharedStore, max_in_flight: usize) -> Self {
        Self {
            store,
            limit: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Dispatch every change and wait for all of them to settle.
    pub async fn dispatch(&self, changes: &[StateChange]) -> SyncReport {
        let mut report = SyncReport::default();
        if changes.is_empty() {
            return report;
        }

        debug!(count = changes.len(), "dispatching derived state writes");

        let mut units: JoinSet<SyncOutcome> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, StateChange> = HashMap::with_capacity(changes.len());
        for change in changes.iter().copied() {
            let store = Arc::clone(&self.store);
            let limit = Arc::clone(&self.limit);
            let handle = units.spawn(async move {
                // Acquire fails only on a closed semaphore; this one is never
                // closed.
                let _permit = match limit.acquire_owned().await {
                    Ok(p) => p,
                    Err(e) => {
                        return SyncOutcome::Failed {
                            change,
                            error: StoreError::Unavailable(e.to_string()).to_string(),
                        };
                    }
                };
                write_one(store, change).await
            });
            in_flight.insert(handle.id(), change);
        }

        while let Some(joined) = units.join_next_with_id().await {
            match joined {
                Ok((_, outcome)) => report.record(outcome),
                Err(join_err) => {
                    // A panicked unit still counts as a failed write.
                    warn!(error = %join_err, "sync unit aborted");
                    if let Some(change) = in_flight.remove(&join_err.id()) {
                        report.record(SyncOutcome::Failed {
                            change,
                            error: join_err.to_string(),
                        });
                    }
                }
            }
        }

        if report.is_clean() {
            info!(applied = report.applied.len(), "sync phase finished");
        } else {
            warn!(
                applied = report.applied.len(),
                failed = report.failed.len(),
                failed_ids = ?report.failed_ids(),
                "sync phase finished with failures; local view kept until next refresh"
            );
        }

        report
    }
}

async fn write_one(store: SharedStore, change: StateChange) -> SyncOutcome {
    match store.write_derived_state(change.id, change.to).await {
        Ok(_) => {
            debug!(task = %change.id, state = %change.to, "derived state written");
            SyncOutcome::Applied(change)
        }
        Err(e) => {
            warn!(
                task = %change.id,
                state = %change.to,
                error = %e,
                "failed to write derived state"
            );
            SyncOutcome::Failed {
                change,
                error: e.to_string(),
            }
        }
    }
}
