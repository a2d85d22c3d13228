//! Goal store adapters.
//!
//! Handlers only see `GoalStore`; the process owns exactly one handle, opened
//! at startup and closed after the server drains.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use goalkeeper_core::{
    error::{GoalError, Result},
    Goal, GoalId, GoalText,
};

pub use memory::InMemoryGoalStore;
pub use mongo::MongoGoalStore;

#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// All goals in store order.
    async fn list(&self) -> Result<Vec<Goal>>;

    /// Persist `text` and return the goal with its new id.
    async fn insert(&self, text: GoalText) -> Result<Goal>;

    /// Remove the goal with `id`. Removing nothing is not an error; an id the
    /// backend cannot interpret is a `GoalError::Store`.
    async fn delete(&self, id: &GoalId) -> Result<()>;

    /// Release connections. Called once at shutdown.
    async fn close(&self) {}
}

/// Reject ids that are not 24 hex digits (the ObjectId string form).
pub fn check_object_id(id: &GoalId) -> Result<()> {
    let s = id.as_str();
    if s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(GoalError::Store(format!("cast to ObjectId failed for {s}")))
    }
}
