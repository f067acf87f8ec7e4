//! The task service: validation, authorization, and store orchestration.
//!
//! [`TaskService`] implements the six public operations over a locked
//! [`TaskStore`]. Every operation takes an explicit [`OwnerId`]; a task is
//! only ever visible or mutable through its owning scope.
//!
//! Check ordering is load-bearing: existence is checked before ownership,
//! so callers can distinguish "doesn't exist" (`NotFound`) from "exists but
//! not yours" (`Forbidden`). The HTTP adapter maps these to 404 and 403.

use parking_lot::RwLock;

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::task::{OwnerId, Task, TaskId};
use crate::validate::{validate_description, validate_title};

/// Filter and pagination options for listing tasks.
///
/// `skip` and `limit` apply after ordering and filtering.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Keep only tasks with this completion state, if set.
    pub completed: Option<bool>,
    /// Number of matching tasks to skip.
    pub skip: usize,
    /// Maximum number of tasks to return. `None` means unlimited.
    pub limit: Option<usize>,
}

/// A partial update to a task. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title, validated and trimmed before being applied.
    pub title: Option<String>,
    /// New description, validated before being applied.
    pub description: Option<String>,
    /// New completion state, set directly (not toggled).
    pub completed: Option<bool>,
}

/// Owner-scoped task operations over a shared store.
///
/// The store itself is single-threaded; this wrapper provides the
/// concurrency contract for the multi-user surface. The write lock covers
/// id allocation plus insert (two concurrent adds can never share an id)
/// and each whole read-modify-write mutation (no lost updates). Reads take
/// the read lock and clone, so `list` always observes a consistent
/// snapshot. No operation holds a lock across any external wait.
#[derive(Debug, Default)]
pub struct TaskService {
    store: RwLock<TaskStore>,
}

impl TaskService {
    /// Creates a service over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(TaskStore::new()),
        }
    }

    /// Creates a service over an existing store (e.g. restored from a
    /// persistence snapshot).
    #[must_use]
    pub fn with_store(store: TaskStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /// Creates a new pending task owned by `owner`.
    ///
    /// The title is trimmed and validated, the description validated,
    /// before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidTitle`] or
    /// [`TaskError::InvalidDescription`] on malformed input, and
    /// [`TaskError::DuplicateId`] if the store invariant is broken.
    pub fn add(
        &self,
        owner: &OwnerId,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, TaskError> {
        let title = validate_title(title)?;
        validate_description(description)?;

        let mut store = self.store.write();
        let id = store.allocate_id();
        let task = Task::new(id, owner.clone(), title, description.map(str::to_string));
        store.insert(task.clone())?;
        Ok(task)
    }

    /// Lists the owner's tasks in ascending id order (creation order),
    /// applying the filter and pagination.
    ///
    /// Returns an empty vector when nothing matches.
    #[must_use]
    pub fn list(&self, owner: &OwnerId, filter: &TaskFilter) -> Vec<Task> {
        let store = self.store.read();
        store
            .iter()
            .filter(|task| task.owner == *owner)
            .filter(|task| filter.completed.is_none_or(|done| task.completed == done))
            .skip(filter.skip)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Retrieves a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] if no task with the id exists, or
    /// [`TaskError::Forbidden`] if it belongs to a different owner.
    pub fn get(&self, owner: &OwnerId, id: TaskId) -> Result<Task, TaskError> {
        let store = self.store.read();
        let task = store.get(id)?;
        Self::check_owner(owner, task)?;
        Ok(task.clone())
    }

    /// Applies a partial update to a task.
    ///
    /// Provided fields are validated in full before existence and
    /// ownership are checked, and nothing is applied on failure.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidTitle`] or
    /// [`TaskError::InvalidDescription`] on malformed input,
    /// [`TaskError::NotFound`] if no task with the id exists, or
    /// [`TaskError::Forbidden`] if it belongs to a different owner.
    pub fn update(&self, owner: &OwnerId, id: TaskId, patch: TaskPatch) -> Result<Task, TaskError> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        validate_description(patch.description.as_deref())?;

        let mut store = self.store.write();
        let task = store.get_mut(id)?;
        Self::check_owner(owner, task)?;
        task.apply_update(title, patch.description);
        if let Some(completed) = patch.completed {
            task.set_completed(completed);
        }
        Ok(task.clone())
    }

    /// Deletes a task, returning it. The id is never reissued.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] if no task with the id exists, or
    /// [`TaskError::Forbidden`] if it belongs to a different owner.
    pub fn delete(&self, owner: &OwnerId, id: TaskId) -> Result<Task, TaskError> {
        let mut store = self.store.write();
        Self::check_owner(owner, store.get(id)?)?;
        store.remove(id)
    }

    /// Flips a task's completion state.
    ///
    /// Pending becomes completed and completed becomes pending; there is
    /// no one-way "complete" action.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] if no task with the id exists, or
    /// [`TaskError::Forbidden`] if it belongs to a different owner.
    pub fn toggle(&self, owner: &OwnerId, id: TaskId) -> Result<Task, TaskError> {
        let mut store = self.store.write();
        let task = store.get_mut(id)?;
        Self::check_owner(owner, task)?;
        task.toggle_completion();
        Ok(task.clone())
    }

    /// Exports every task (all owners) plus the id counter, for the
    /// persistence adapter.
    #[must_use]
    pub fn export(&self) -> (Vec<Task>, u64) {
        let store = self.store.read();
        (store.iter().cloned().collect(), store.next_id())
    }

    /// Ownership gate, applied strictly after the existence check.
    fn check_owner(owner: &OwnerId, task: &Task) -> Result<(), TaskError> {
        if task.owner == *owner {
            Ok(())
        } else {
            Err(TaskError::Forbidden(task.id))
        }
    }
}
