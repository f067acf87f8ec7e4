//! The task entity and its identifiers.
//!
//! [`Task`] is the single task definition shared by every surface; storage
//! adapters map it to and from their own row format. Mutations go through
//! [`Task::apply_update`] and [`Task::toggle_completion`], which keep the
//! `updated_at` bookkeeping in one place. Validation is the caller's
//! responsibility before invoking either.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a task.
///
/// Ids are allocated monotonically by the store, starting at 1, and are
/// never reused — not even after the task is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Opaque identifier for the owner a task belongs to.
///
/// Owners are passed explicitly to every service call, never inferred from
/// ambient context. The console surface uses one fixed owner; the HTTP
/// surface resolves the bearer credential to an owner per request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an `OwnerId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-allocated identifier, immutable once assigned.
    pub id: TaskId,
    /// Owner this task belongs to.
    pub owner: OwnerId,
    /// Task title, 1–200 characters, stored trimmed.
    pub title: String,
    /// Optional free-form description, up to 1000 characters, not trimmed.
    pub description: Option<String>,
    /// Completion state. New tasks always start pending.
    pub completed: bool,
    /// Set once at creation, immutable thereafter.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation. Always `>= created_at`.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task, stamping both timestamps from a single
    /// clock reading so `created_at <= updated_at` holds from the start.
    #[must_use]
    pub fn new(id: TaskId, owner: OwnerId, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner,
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the provided fields and refreshes `updated_at` if at
    /// least one field was supplied.
    ///
    /// No re-validation happens here; callers validate before invoking.
    /// A `None` field keeps the current value.
    pub fn apply_update(&mut self, title: Option<String>, description: Option<String>) {
        let changed = title.is_some() || description.is_some();
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if changed {
            self.updated_at = Utc::now();
        }
    }

    /// Sets the completion state, refreshing `updated_at` only on change.
    pub fn set_completed(&mut self, completed: bool) {
        if self.completed != completed {
            self.completed = completed;
            self.updated_at = Utc::now();
        }
    }

    /// Flips the completion state and refreshes `updated_at`.
    ///
    /// The flip is symmetric: toggling twice returns the task to its
    /// original state.
    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Utc::now();
    }
}
