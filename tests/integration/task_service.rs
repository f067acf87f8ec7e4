//! Integration tests for the task lifecycle engine.
//!
//! Covers the end-to-end lifecycle scenarios, id monotonicity across
//! deletes, ownership isolation, timestamp ordering, and concurrent id
//! allocation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskdeck_core::{OwnerId, TaskError, TaskFilter, TaskId, TaskPatch, TaskService};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn alice() -> OwnerId {
    OwnerId::from("alice")
}

fn bob() -> OwnerId {
    OwnerId::from("bob")
}

/// Lets the clock advance so `updated_at > created_at` assertions can be
/// strict.
fn tick() {
    thread::sleep(Duration::from_millis(2));
}

// ---------------------------------------------------------------------------
// Lifecycle scenarios
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle_scenario() {
    let service = TaskService::new();
    let owner = alice();

    let first = service.add(&owner, "Buy milk", None).unwrap();
    assert_eq!(first.id, TaskId::new(1));
    assert!(!first.completed);
    assert!(first.description.is_none());

    let second = service
        .add(&owner, "Write report", Some("Q3 summary"))
        .unwrap();
    assert_eq!(second.id, TaskId::new(2));

    let tasks = service.list(&owner, &TaskFilter::default());
    let ids: Vec<u64> = tasks.iter().map(|t| t.id.value()).collect();
    assert_eq!(ids, vec![1, 2]);

    let toggled = service.toggle(&owner, first.id).unwrap();
    assert!(toggled.completed);

    let updated = service
        .update(
            &owner,
            second.id,
            TaskPatch {
                title: Some("Write report v2".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Write report v2");
    assert_eq!(updated.description.as_deref(), Some("Q3 summary"));

    service.delete(&owner, first.id).unwrap();
    assert_eq!(
        service.get(&owner, first.id).unwrap_err(),
        TaskError::NotFound(first.id)
    );
}

#[test]
fn validation_failure_scenario() {
    let service = TaskService::new();
    let owner = alice();

    assert_eq!(
        service.add(&owner, "", None).unwrap_err(),
        TaskError::InvalidTitle("Title cannot be empty.".to_string())
    );

    let long_title = "A".repeat(201);
    let err = service.add(&owner, &long_title, None).unwrap_err();
    assert!(matches!(err, TaskError::InvalidTitle(msg) if msg.contains("200")));

    let long_description = "A".repeat(1001);
    let err = service
        .add(&owner, "ok", Some(&long_description))
        .unwrap_err();
    assert!(matches!(err, TaskError::InvalidDescription(msg) if msg.contains("1000")));

    // Nothing was created along the way.
    assert!(service.list(&owner, &TaskFilter::default()).is_empty());
}

// ---------------------------------------------------------------------------
// Id allocation
// ---------------------------------------------------------------------------

#[test]
fn ids_are_strictly_increasing_across_deletes() {
    let service = TaskService::new();
    let owner = alice();

    let mut seen = Vec::new();
    for round in 0..3 {
        let a = service.add(&owner, &format!("a{round}"), None).unwrap();
        let b = service.add(&owner, &format!("b{round}"), None).unwrap();
        seen.push(a.id.value());
        seen.push(b.id.value());
        service.delete(&owner, a.id).unwrap();
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn concurrent_adds_never_share_ids() {
    let service = Arc::new(TaskService::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let owner = OwnerId::new(format!("owner-{worker}"));
                (0..25)
                    .map(|i| {
                        service
                            .add(&owner, &format!("task {i}"), None)
                            .unwrap()
                            .id
                            .value()
                    })
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    // 200 adds produced 200 distinct ids covering 1..=200.
    assert_eq!(ids.len(), 200);
    assert_eq!(ids.first(), Some(&1));
    assert_eq!(ids.last(), Some(&200));
}

// ---------------------------------------------------------------------------
// Toggle and timestamps
// ---------------------------------------------------------------------------

#[test]
fn toggle_twice_restores_the_task() {
    let service = TaskService::new();
    let owner = alice();
    let original = service.add(&owner, "Buy milk", Some("2 liters")).unwrap();

    tick();
    let once = service.toggle(&owner, original.id).unwrap();
    assert!(once.completed);

    tick();
    let twice = service.toggle(&owner, original.id).unwrap();
    assert_eq!(twice.completed, original.completed);
    assert_eq!(twice.id, original.id);
    assert_eq!(twice.title, original.title);
    assert_eq!(twice.description, original.description);
    assert_eq!(twice.owner, original.owner);
    assert_eq!(twice.created_at, original.created_at);
}

#[test]
fn updated_at_tracks_every_mutation() {
    let service = TaskService::new();
    let owner = alice();
    let task = service.add(&owner, "Buy milk", None).unwrap();
    assert_eq!(task.created_at, task.updated_at);

    tick();
    let toggled = service.toggle(&owner, task.id).unwrap();
    assert!(toggled.updated_at > toggled.created_at);

    tick();
    let updated = service
        .update(
            &owner,
            task.id,
            TaskPatch {
                description: Some("2 liters".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert!(updated.updated_at > toggled.updated_at);
    assert_eq!(updated.created_at, task.created_at);
}

// ---------------------------------------------------------------------------
// Ownership isolation
// ---------------------------------------------------------------------------

#[test]
fn tasks_are_invisible_across_owners() {
    let service = TaskService::new();
    let task = service.add(&alice(), "hers", None).unwrap();

    assert!(service.list(&bob(), &TaskFilter::default()).is_empty());

    assert_eq!(
        service.get(&bob(), task.id).unwrap_err(),
        TaskError::Forbidden(task.id)
    );
    assert_eq!(
        service
            .update(
                &bob(),
                task.id,
                TaskPatch {
                    title: Some("mine now".to_string()),
                    ..TaskPatch::default()
                }
            )
            .unwrap_err(),
        TaskError::Forbidden(task.id)
    );
    assert_eq!(
        service.toggle(&bob(), task.id).unwrap_err(),
        TaskError::Forbidden(task.id)
    );
    assert_eq!(
        service.delete(&bob(), task.id).unwrap_err(),
        TaskError::Forbidden(task.id)
    );

    // Existence is checked first: an id that exists for nobody is
    // NotFound, not Forbidden.
    assert_eq!(
        service.get(&bob(), TaskId::new(99)).unwrap_err(),
        TaskError::NotFound(TaskId::new(99))
    );

    // And the owner still sees the task untouched.
    let unchanged = service.get(&alice(), task.id).unwrap();
    assert_eq!(unchanged, task);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn pagination_applies_after_filtering() {
    let service = TaskService::new();
    let owner = alice();
    for i in 1..=10 {
        let task = service.add(&owner, &format!("task {i}"), None).unwrap();
        if i % 2 == 0 {
            service.toggle(&owner, task.id).unwrap();
        }
    }

    // Pending tasks are 1, 3, 5, 7, 9; skip one, take two.
    let page = service.list(
        &owner,
        &TaskFilter {
            completed: Some(false),
            skip: 1,
            limit: Some(2),
        },
    );
    let ids: Vec<u64> = page.iter().map(|t| t.id.value()).collect();
    assert_eq!(ids, vec![3, 5]);
}

#[test]
fn list_beyond_the_end_is_empty() {
    let service = TaskService::new();
    let owner = alice();
    service.add(&owner, "only one", None).unwrap();

    let page = service.list(
        &owner,
        &TaskFilter {
            skip: 5,
            ..TaskFilter::default()
        },
    );
    assert!(page.is_empty());
}
