//! MongoDB-backed goal store.
//!
//! Documents are `{ _id: ObjectId, text: string }` in a single collection.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use serde::{Deserialize, Serialize};

use goalkeeper_core::{
    error::{GoalError, Result},
    Goal, GoalId, GoalText,
};

use crate::config::StoreSection;
use crate::store::GoalStore;

#[derive(Debug, Serialize, Deserialize)]
struct GoalDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    text: String,
}

impl From<GoalDocument> for Goal {
    fn from(d: GoalDocument) -> Self {
        Goal {
            id: GoalId::new(d.id.to_hex()),
            text: d.text,
        }
    }
}

fn store_err(e: mongodb::error::Error) -> GoalError {
    GoalError::Store(e.to_string())
}

pub struct MongoGoalStore {
    client: Client,
    goals: Collection<GoalDocument>,
}

impl MongoGoalStore {
    /// Connect and verify the deployment answers a `ping`.
    pub async fn connect(cfg: &StoreSection) -> Result<Self> {
        let url = cfg
            .url
            .as_deref()
            .ok_or_else(|| {
                GoalError::Config("MONGO_URL is not defined in the environment or .env".into())
            })?;

        let client = Client::with_uri_str(url).await.map_err(store_err)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(&cfg.database));

        db.run_command(doc! { "ping": 1 }).await.map_err(store_err)?;
        tracing::info!(database = %db.name(), collection = %cfg.collection, "connected to MongoDB");

        Ok(Self {
            goals: db.collection(&cfg.collection),
            client,
        })
    }
}

#[async_trait]
impl GoalStore for MongoGoalStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn list(&self) -> Result<Vec<Goal>> {
        let cursor = self.goals.find(doc! {}).await.map_err(store_err)?;
        let docs: Vec<GoalDocument> = cursor.try_collect().await.map_err(store_err)?;
        Ok(docs.into_iter().map(Goal::from).collect())
    }

    async fn insert(&self, text: GoalText) -> Result<Goal> {
        let d = GoalDocument {
            id: ObjectId::new(),
            text: text.into_inner(),
        };
        self.goals.insert_one(&d).await.map_err(store_err)?;
        Ok(d.into())
    }

    async fn delete(&self, id: &GoalId) -> Result<()> {
        // A malformed id is a cast failure, not a miss.
        let oid = ObjectId::parse_str(id.as_str())
            .map_err(|e| GoalError::Store(format!("cast to ObjectId failed for {id}: {e}")))?;

        let res = self
            .goals
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(store_err)?;
        tracing::debug!(id = %id, deleted = res.deleted_count, "goal delete");
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
