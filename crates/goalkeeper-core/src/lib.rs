//! Goalkeeper core: the goal domain model and the shared error surface.
//!
//! This crate defines the `Goal` entity, text validation, and the error type
//! shared by the server and any tooling. It carries no transport, store, or
//! runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GoalError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod goal;

/// Shared result type.
pub use error::{GoalError, Result};
pub use goal::{Goal, GoalId, GoalText};
