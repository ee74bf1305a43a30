#![allow(dead_code)]

pub use blockwise_test_utils::builders;
pub use blockwise_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;

use blockwise::engine::{Board, BoardOptions};
use blockwise::store::{NewTask, SharedStore, SystemOfRecord};
use blockwise::types::TaskId;

/// Create tasks titled `titles` in TODO and return their ids in order.
pub async fn create_all(store: &dyn SystemOfRecord, titles: &[&str]) -> Vec<TaskId> {
    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        let task = store
            .create(NewTask::titled(*title))
            .await
            .expect("create should succeed");
        ids.push(task.id);
    }
    ids
}

/// A board over `store` with default options.
pub fn board_over<S: SystemOfRecord + 'static>(store: S) -> Board {
    let store: SharedStore = Arc::new(store);
    Board::new(store, BoardOptions::default())
}
