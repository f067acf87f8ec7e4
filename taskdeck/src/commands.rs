//! Command parsing and the interactive command loop.
//!
//! The loop reads one command per line, prompts for any extra fields, and
//! calls the task service with the fixed single-user owner. It is generic
//! over its reader and writer so tests can run scripted sessions against
//! in-memory buffers.

use std::io::{self, BufRead, Write};

use taskdeck_core::{OwnerId, TaskFilter, TaskId, TaskPatch, TaskService};

use crate::display;

/// The implicit owner of every task in the console app.
pub const LOCAL_OWNER: &str = "local";

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create a new task.
    Add,
    /// Show all tasks.
    List,
    /// Edit a task's title/description.
    Update,
    /// Remove a task.
    Delete,
    /// Toggle a task's completion state.
    Complete,
    /// Show the menu.
    Help,
    /// Leave the app.
    Exit,
}

impl Command {
    /// Parses a command word, case-insensitively.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "add" => Some(Self::Add),
            "list" => Some(Self::List),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "complete" => Some(Self::Complete),
            "help" => Some(Self::Help),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// The interactive command loop over a task service.
pub struct Repl<'a, R, W> {
    service: &'a TaskService,
    owner: OwnerId,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Repl<'a, R, W> {
    /// Creates a loop over the given service and I/O pair, using the
    /// fixed single-user owner.
    pub fn new(service: &'a TaskService, input: R, output: W) -> Self {
        Self {
            service,
            owner: OwnerId::from(LOCAL_OWNER),
            input,
            output,
        }
    }

    /// Runs the loop until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the reader or writer. Task errors are
    /// reported to the user and never abort the loop.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Todo Console App!")?;
        display::write_menu(&mut self.output)?;

        loop {
            write!(self.output, "\n> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                // End of input behaves like `exit`.
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            match Command::parse(&line) {
                Some(Command::Exit) => break,
                Some(Command::Help) => display::write_menu(&mut self.output)?,
                Some(Command::Add) => self.handle_add()?,
                Some(Command::List) => self.handle_list()?,
                Some(Command::Update) => self.handle_update()?,
                Some(Command::Delete) => self.handle_delete()?,
                Some(Command::Complete) => self.handle_complete()?,
                None => writeln!(
                    self.output,
                    "Unknown command: {line}. Type 'help' for available commands."
                )?,
            }
        }

        writeln!(self.output, "{}", display::EXIT_MESSAGE)
    }

    fn handle_add(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt("Enter task title: ")? else {
            return Ok(());
        };
        let Some(description) = self.prompt("Enter task description (optional): ")? else {
            return Ok(());
        };
        let description = (!description.is_empty()).then_some(description);

        match self.service.add(&self.owner, &title, description.as_deref()) {
            Ok(task) => writeln!(self.output, "✓ Task #{} created: {}", task.id, task.title),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn handle_list(&mut self) -> io::Result<()> {
        let tasks = self.service.list(&self.owner, &TaskFilter::default());
        display::write_tasks(&mut self.output, &tasks)
    }

    fn handle_update(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_for_id("Enter task ID to update: ")? else {
            return Ok(());
        };

        // Show the current title so blank input can keep it.
        let current = match self.service.get(&self.owner, id) {
            Ok(task) => task,
            Err(e) => return writeln!(self.output, "Error: {e}"),
        };

        let title_prompt = format!("Enter new title (leave blank to keep '{}'): ", current.title);
        let Some(title) = self.prompt(&title_prompt)? else {
            return Ok(());
        };
        let Some(description) = self.prompt("Enter new description (leave blank to keep current): ")?
        else {
            return Ok(());
        };

        let patch = TaskPatch {
            title: (!title.is_empty()).then_some(title),
            description: (!description.is_empty()).then_some(description),
            completed: None,
        };
        match self.service.update(&self.owner, id, patch) {
            Ok(task) => writeln!(self.output, "✓ Task #{} updated", task.id),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn handle_delete(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_for_id("Enter task ID to delete: ")? else {
            return Ok(());
        };
        match self.service.delete(&self.owner, id) {
            Ok(task) => writeln!(self.output, "✓ Task #{} deleted: {}", task.id, task.title),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn handle_complete(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_for_id("Enter task ID to mark complete/incomplete: ")? else {
            return Ok(());
        };
        match self.service.toggle(&self.owner, id) {
            Ok(task) => {
                let status = if task.completed { "complete" } else { "incomplete" };
                writeln!(
                    self.output,
                    "✓ Task #{} marked as {status}: {}",
                    task.id, task.title
                )
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    /// Prompts for a task id, reporting non-numeric input as an error.
    /// Returns `None` on end of input or bad input (already reported).
    fn prompt_for_id(&mut self, message: &str) -> io::Result<Option<TaskId>> {
        let Some(raw) = self.prompt(message)? else {
            return Ok(None);
        };
        match raw.parse::<TaskId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Error: Task ID must be a number.")?;
                Ok(None)
            }
        }
    }

    /// Writes a prompt and reads one trimmed line. Returns `None` at end
    /// of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| line.trim().to_string()))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            Ok(None)
        } else {
            Ok(Some(buffer))
        }
    }
}
