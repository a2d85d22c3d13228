use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use goalkeeper_core::{error::Result, Goal, GoalId, GoalText};

use crate::store::{check_object_id, GoalStore};

/// Process-local store keeping insertion order. Ids are 24 hex digits so they
/// look like the ones the MongoDB store hands out, and deleting by an id of
/// any other shape fails the same way it does there.
#[derive(Default)]
pub struct InMemoryGoalStore {
    goals: RwLock<Vec<Goal>>,
    next_id: AtomicU64,
}

impl InMemoryGoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.goals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl GoalStore for InMemoryGoalStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.read().await.clone())
    }

    async fn insert(&self, text: GoalText) -> Result<Goal> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let goal = Goal::new(GoalId::new(format!("{n:024x}")), text);
        self.goals.write().await.push(goal.clone());
        Ok(goal)
    }

    async fn delete(&self, id: &GoalId) -> Result<()> {
        check_object_id(id)?;
        self.goals.write().await.retain(|g| &g.id != id);
        Ok(())
    }
}
