//! Output formatting for the console app.
//!
//! All writers are generic so the command loop can be exercised against
//! in-memory buffers in tests.

use std::io::{self, Write};

use taskdeck_core::Task;

/// Symbol shown for a pending task.
pub const TASK_INCOMPLETE_SYMBOL: &str = "○";

/// Symbol shown for a completed task.
pub const TASK_COMPLETE_SYMBOL: &str = "●";

/// Banner line shown in the menu box.
pub const WELCOME_MESSAGE: &str = "TODO CONSOLE APP v1.0";

/// Farewell line printed when the app exits.
pub const EXIT_MESSAGE: &str = "Goodbye! Thanks for using the Todo Console App.";

/// Interior width of the menu box.
const MENU_WIDTH: usize = 32;

/// Commands shown in the menu, in display order.
const COMMANDS: &[(&str, &str)] = &[
    ("add", "Add new task"),
    ("list", "View all tasks"),
    ("update", "Update task"),
    ("delete", "Remove task"),
    ("complete", "Mark complete"),
    ("help", "Show this menu"),
    ("exit", "Exit application"),
];

/// Writes the boxed command menu.
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn write_menu<W: Write>(out: &mut W) -> io::Result<()> {
    let bar = "═".repeat(MENU_WIDTH);
    writeln!(out, "╔{bar}╗")?;
    writeln!(out, "║ {WELCOME_MESSAGE:<width$} ║", width = MENU_WIDTH - 2)?;
    writeln!(out, "╠{bar}╣")?;
    for (command, description) in COMMANDS {
        let item = format!("{command:<8} - {description}");
        writeln!(out, "║ {item:<width$} ║", width = MENU_WIDTH - 2)?;
    }
    writeln!(out, "╚{bar}╝")?;
    Ok(())
}

/// Writes a single task line (plus its description, if any).
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn write_task<W: Write>(out: &mut W, task: &Task) -> io::Result<()> {
    let symbol = if task.completed {
        TASK_COMPLETE_SYMBOL
    } else {
        TASK_INCOMPLETE_SYMBOL
    };
    let status = if task.completed { "COMPLETED" } else { "PENDING" };
    writeln!(out, "{symbol} [{}] {} - {status}", task.id, task.title)?;
    if let Some(description) = &task.description {
        writeln!(out, "    Description: {description}")?;
    }
    Ok(())
}

/// Writes the task list with a summary header, or a hint when empty.
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn write_tasks<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No tasks found.");
    }

    let completed = tasks.iter().filter(|t| t.completed).count();
    writeln!(out, "Your Tasks ({} total, {completed} complete):", tasks.len())?;
    for task in tasks {
        write_task(out, task)?;
        writeln!(out)?;
    }
    Ok(())
}
