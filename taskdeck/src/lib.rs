//! Taskdeck — single-user console todo app library.
//!
//! The console surface drives the shared task engine through a
//! line-oriented command loop. Storage is in memory; everything lives for
//! the duration of the session.

pub mod commands;
pub mod display;
