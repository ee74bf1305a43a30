// tests/store_memory.rs

use std::error::Error;

use blockwise::store::{InMemoryStore, NewTask, StoreError, SystemOfRecord, TaskPatch};
use blockwise::types::{TaskId, TaskState};
use chrono::NaiveDate;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn create_assigns_increasing_ids_and_defaults_to_todo() -> TestResult {
    let store = InMemoryStore::new();

    let a = store.create(NewTask::titled("a")).await?;
    let b = store
        .create(NewTask {
            description: Some("second".to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            state: Some(TaskState::Backlog),
            ..NewTask::titled("  b  ")
        })
        .await?;

    assert_eq!(a.id, TaskId(1));
    assert_eq!(b.id, TaskId(2));
    assert_eq!(a.state, TaskState::Todo);
    assert_eq!(b.state, TaskState::Backlog);
    assert_eq!(b.title, "b");
    assert_eq!(b.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    assert_eq!(store.list().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn create_rejects_non_initial_states_and_empty_titles() -> TestResult {
    let store = InMemoryStore::new();

    for state in [TaskState::InProgress, TaskState::Done, TaskState::Blocked] {
        let result = store
            .create(NewTask {
                state: Some(state),
                ..NewTask::titled("x")
            })
            .await;
        assert_eq!(result, Err(StoreError::InvalidInitialState(state)));
    }

    let result = store.create(NewTask::titled("   ")).await;
    assert_eq!(result, Err(StoreError::EmptyTitle));
    assert!(store.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn edges_are_kept_as_mutual_inverses() -> TestResult {
    let store = InMemoryStore::new();
    let a = store.create(NewTask::titled("a")).await?.id;
    let b = store.create(NewTask::titled("b")).await?.id;

    store.add_edge(b, a).await?;
    // Idempotent.
    store.add_edge(b, a).await?;

    let tasks = store.list().await?;
    assert_eq!(tasks[0].dependents.iter().copied().collect::<Vec<_>>(), vec![b]);
    assert_eq!(tasks[1].blockers.iter().copied().collect::<Vec<_>>(), vec![a]);

    store.remove_edge(b, a).await?;
    // Removing a missing edge is a no-op.
    store.remove_edge(b, a).await?;

    let tasks = store.list().await?;
    assert!(tasks[0].dependents.is_empty());
    assert!(tasks[1].blockers.is_empty());
    Ok(())
}

#[tokio::test]
async fn add_edge_validates_both_ends() -> TestResult {
    let store = InMemoryStore::new();
    let a = store.create(NewTask::titled("a")).await?.id;

    assert_eq!(
        store.add_edge(a, a).await,
        Err(StoreError::SelfDependency(a))
    );
    assert_eq!(
        store.add_edge(a, TaskId(77)).await,
        Err(StoreError::NotFound(TaskId(77)))
    );
    assert_eq!(
        store.add_edge(TaskId(78), a).await,
        Err(StoreError::NotFound(TaskId(78)))
    );
    assert!(store.list().await?[0].blockers.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_cleans_up_edges_in_both_directions() -> TestResult {
    let store = InMemoryStore::new();
    let a = store.create(NewTask::titled("a")).await?.id;
    let b = store.create(NewTask::titled("b")).await?.id;
    let c = store.create(NewTask::titled("c")).await?.id;
    store.add_edge(b, a).await?;
    store.add_edge(c, b).await?;

    store.delete(b).await?;

    let tasks = store.list().await?;
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.blockers.is_empty() && t.dependents.is_empty()));
    assert_eq!(store.delete(b).await, Err(StoreError::NotFound(b)));

    // Ids are never reused.
    let d = store.create(NewTask::titled("d")).await?.id;
    assert_eq!(d, TaskId(4));
    Ok(())
}

#[tokio::test]
async fn patch_enforces_user_transition_rule() -> TestResult {
    let store = InMemoryStore::new();
    let a = store.create(NewTask::titled("a")).await?.id;

    let done = store.patch(a, TaskPatch::state(TaskState::Done)).await?;
    assert_eq!(done.state, TaskState::Done);

    // Engine-only write puts the task into BLOCKED.
    store.write_derived_state(a, TaskState::Blocked).await?;

    let rejected = store
        .patch(
            a,
            TaskPatch {
                title: Some("renamed".to_string()),
                state: Some(TaskState::InProgress),
                ..TaskPatch::default()
            },
        )
        .await;
    match rejected {
        Err(StoreError::IllegalTransition(err)) => {
            assert_eq!(err.from, TaskState::Blocked);
            assert_eq!(err.to, TaskState::InProgress);
        }
        other => panic!("Expected IllegalTransition, got: {:?}", other),
    }

    // Nothing from the rejected patch was applied.
    let tasks = store.list().await?;
    let stored = &tasks[0];
    assert_eq!(stored.state, TaskState::Blocked);
    assert_eq!(stored.title, "a");

    // Non-state fields can still be edited while BLOCKED.
    let renamed = store
        .patch(
            a,
            TaskPatch {
                title: Some("renamed".to_string()),
                ..TaskPatch::default()
            },
        )
        .await?;
    assert_eq!(renamed.title, "renamed");
    assert_eq!(renamed.state, TaskState::Blocked);
    Ok(())
}

#[tokio::test]
async fn patch_can_clear_optional_fields() -> TestResult {
    let store = InMemoryStore::new();
    let a = store
        .create(NewTask {
            description: Some("text".to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31),
            ..NewTask::titled("a")
        })
        .await?;

    let patch = TaskPatch {
        description: Some(None),
        due_date: Some(None),
        ..TaskPatch::default()
    };
    assert!(!patch.is_empty());

    let cleared = store.patch(a.id, patch).await?;
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.due_date, None);
    assert!(cleared.updated_at >= a.updated_at);
    Ok(())
}
