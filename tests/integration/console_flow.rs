//! Integration tests for the console command loop.
//!
//! Runs scripted sessions against in-memory buffers: the script is the
//! exact byte stream a user would type, and assertions run against both
//! the rendered output and the service state left behind.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskdeck::commands::{LOCAL_OWNER, Repl};
use taskdeck_core::{OwnerId, TaskFilter, TaskService};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Runs a scripted session against `service`, returning what was printed.
fn run_session(service: &TaskService, script: &str) -> String {
    let mut output = Vec::new();
    Repl::new(service, script.as_bytes(), &mut output)
        .run()
        .expect("session runs");
    String::from_utf8(output).expect("valid utf-8 output")
}

fn local() -> OwnerId {
    OwnerId::from(LOCAL_OWNER)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[test]
fn menu_and_goodbye_frame_every_session() {
    let service = TaskService::new();
    let output = run_session(&service, "exit\n");
    assert!(output.contains("Welcome to the Todo Console App!"));
    assert!(output.contains("TODO CONSOLE APP v1.0"));
    assert!(output.contains("Goodbye! Thanks for using the Todo Console App."));
}

#[test]
fn full_session_exercises_every_command() {
    let service = TaskService::new();
    let script = concat!(
        "add\n",
        "Buy milk\n",
        "\n", // no description
        "add\n",
        "Write report\n",
        "Q3 summary\n",
        "list\n",
        "complete\n",
        "1\n",
        "update\n",
        "2\n",
        "Write report v2\n",
        "\n", // keep description
        "delete\n",
        "1\n",
        "list\n",
        "exit\n",
    );
    let output = run_session(&service, script);

    assert!(output.contains("✓ Task #1 created: Buy milk"));
    assert!(output.contains("✓ Task #2 created: Write report"));
    assert!(output.contains("Your Tasks (2 total, 0 complete):"));
    assert!(output.contains("✓ Task #1 marked as complete: Buy milk"));
    assert!(output.contains("✓ Task #2 updated"));
    assert!(output.contains("✓ Task #1 deleted: Buy milk"));
    assert!(output.contains("Your Tasks (1 total, 0 complete):"));

    // The service state matches what the session showed.
    let tasks = service.list(&local(), &TaskFilter::default());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write report v2");
    assert_eq!(tasks[0].description.as_deref(), Some("Q3 summary"));
}

#[test]
fn errors_are_reported_without_aborting_the_loop() {
    let service = TaskService::new();
    let script = concat!(
        "add\n",
        "\n", // empty title
        "\n",
        "complete\n",
        "5\n", // no such task
        "add\n",
        "Recover\n",
        "\n",
        "exit\n",
    );
    let output = run_session(&service, script);

    assert!(output.contains("Error: Title cannot be empty."));
    assert!(output.contains("Error: Task #5 not found."));
    assert!(output.contains("✓ Task #1 created: Recover"));
}

#[test]
fn update_with_blank_fields_keeps_current_values() {
    let service = TaskService::new();
    let script = concat!(
        "add\n",
        "Original title\n",
        "Original description\n",
        "update\n",
        "1\n",
        "\n", // keep title
        "\n", // keep description
        "exit\n",
    );
    let output = run_session(&service, script);
    assert!(output.contains("leave blank to keep 'Original title'"));

    let tasks = service.list(&local(), &TaskFilter::default());
    assert_eq!(tasks[0].title, "Original title");
    assert_eq!(tasks[0].description.as_deref(), Some("Original description"));
}

#[test]
fn complete_toggles_back_to_incomplete() {
    let service = TaskService::new();
    let script = concat!(
        "add\n",
        "Flip me\n",
        "\n",
        "complete\n",
        "1\n",
        "complete\n",
        "1\n",
        "exit\n",
    );
    let output = run_session(&service, script);
    assert!(output.contains("✓ Task #1 marked as complete: Flip me"));
    assert!(output.contains("✓ Task #1 marked as incomplete: Flip me"));

    let tasks = service.list(&local(), &TaskFilter::default());
    assert!(!tasks[0].completed);
}

#[test]
fn help_reprints_the_menu() {
    let service = TaskService::new();
    let output = run_session(&service, "help\nexit\n");
    // Once at startup, once for the command.
    assert_eq!(output.matches("TODO CONSOLE APP v1.0").count(), 2);
}

#[test]
fn tasks_live_under_the_fixed_local_owner() {
    let service = TaskService::new();
    run_session(&service, "add\nBuy milk\n\nexit\n");

    assert_eq!(service.list(&local(), &TaskFilter::default()).len(), 1);
    assert!(
        service
            .list(&OwnerId::from("someone-else"), &TaskFilter::default())
            .is_empty()
    );
}
