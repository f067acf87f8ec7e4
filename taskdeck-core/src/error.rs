//! Error taxonomy for task operations.
//!
//! Every fallible operation in this crate returns [`TaskError`]. Adapters
//! pattern-match the variants into their own representation (HTTP status
//! code, console message) and never suppress them.

use thiserror::Error;

use crate::task::TaskId;

/// Errors that can occur during task operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Title failed validation: empty after trimming, or too long.
    /// The message is user-facing and reported verbatim.
    #[error("{0}")]
    InvalidTitle(String),
    /// Description failed validation: too long.
    /// The message is user-facing and reported verbatim.
    #[error("{0}")]
    InvalidDescription(String),
    /// No task with the given id exists.
    #[error("Task #{0} not found.")]
    NotFound(TaskId),
    /// The task exists but belongs to a different owner.
    #[error("Task #{0} belongs to another user.")]
    Forbidden(TaskId),
    /// A task with the given id is already present in the store.
    ///
    /// Ids are store-allocated, so this indicates a broken invariant
    /// rather than bad user input.
    #[error("Task #{0} already exists in the store.")]
    DuplicateId(TaskId),
}
