//! Task lifecycle and validation engine for `taskdeck`.
//!
//! This crate is the transport-free core shared by the console app and the
//! HTTP server: the [`Task`] entity, the validation rules, the id-allocating
//! [`TaskStore`], and the owner-scoped [`TaskService`] implementing the six
//! task operations (add, list, get, update, delete, toggle).

pub mod error;
pub mod service;
pub mod store;
pub mod task;
pub mod validate;

pub use error::TaskError;
pub use service::{TaskFilter, TaskPatch, TaskService};
pub use store::TaskStore;
pub use task::{OwnerId, Task, TaskId};
pub use validate::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, validate_description, validate_title};
