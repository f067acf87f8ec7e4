//! Taskdeck API server library.
//!
//! Exposes the HTTP surface for use in tests and embedding. The server
//! authenticates users with bearer tokens, scopes every task route to its
//! owner, and persists state as a JSON snapshot between runs.

pub mod api;
pub mod auth;
pub mod config;
pub mod snapshot;
pub mod users;
