//! JSON snapshot persistence for server state.
//!
//! The whole server state (users, tasks, id counter) is one JSON document,
//! loaded at startup and rewritten after each successful mutation. Writes
//! go to a sibling temp file first and are renamed into place, so a crash
//! mid-write never leaves a truncated snapshot behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskdeck_core::Task;

use crate::users::User;

/// Errors that can occur when loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Failed to read the snapshot file.
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the snapshot file.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Snapshot contents are not valid JSON for the expected shape.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialized server state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All registered users.
    pub users: Vec<User>,
    /// All tasks across all owners.
    pub tasks: Vec<Task>,
    /// The task id counter at save time.
    pub next_id: u64,
}

/// Default snapshot location, under the platform data directory.
#[must_use]
pub fn default_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("taskdeck").join("state.json"))
}

/// Loads a snapshot from `path`. A missing file is not an error — it just
/// means a fresh start.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the file exists but cannot be read or
/// parsed.
pub fn load(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SnapshotError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Saves a snapshot to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`SnapshotError`] if serialization or any filesystem step
/// fails.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let contents = serde_json::to_string_pretty(snapshot)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| SnapshotError::Write {
        path: tmp.clone(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
