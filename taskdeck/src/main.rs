//! Taskdeck — single-user console todo app.
//!
//! Reads line-oriented commands from stdin and keeps tasks in memory for
//! the duration of the session. Logs go to a file, never stdout.
//!
//! ```bash
//! cargo run --bin taskdeck
//!
//! # With debug logging to a custom file
//! cargo run --bin taskdeck -- --log-level debug --log-file /tmp/taskdeck.log
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::commands::Repl;
use taskdeck_core::TaskService;

/// CLI arguments for the console app.
#[derive(clap::Parser, Debug)]
#[command(version, about = "Taskdeck console todo app")]
struct CliArgs {
    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    log_level: String,

    /// Path of the log file (default: `<tmp>/taskdeck.log`).
    #[arg(long)]
    log_file: Option<std::path::PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Logging goes to a file; stdout belongs to the command loop.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck console starting");

    let service = TaskService::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(&service, stdin.lock(), stdout.lock());
    let result = repl.run();

    tracing::info!("taskdeck console exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure
/// all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
