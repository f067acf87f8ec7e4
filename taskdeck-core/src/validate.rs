//! Validation rules for task fields.
//!
//! Pure functions, called on every create and on every update that supplies
//! the corresponding field — always before any store mutation.

use crate::error::TaskError;

/// Maximum allowed task title length in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum allowed task description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validates a task title and returns its trimmed form.
///
/// Leading and trailing whitespace is stripped before checking. The trimmed
/// title must be 1 to [`TITLE_MAX_CHARS`] characters long.
///
/// # Errors
///
/// Returns [`TaskError::InvalidTitle`] if the trimmed title is empty or
/// exceeds the length limit.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::InvalidTitle("Title cannot be empty.".to_string()));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::InvalidTitle(format!(
            "Title must be {TITLE_MAX_CHARS} characters or less."
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates an optional task description.
///
/// Descriptions are not trimmed; only the length is checked.
///
/// # Errors
///
/// Returns [`TaskError::InvalidDescription`] if the description exceeds
/// [`DESCRIPTION_MAX_CHARS`] characters.
pub fn validate_description(description: Option<&str>) -> Result<(), TaskError> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(TaskError::InvalidDescription(format!(
                "Description must be {DESCRIPTION_MAX_CHARS} characters or less."
            )));
        }
    }
    Ok(())
}
