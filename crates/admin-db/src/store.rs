//! Read access to stored documents.
//!
//! Request-time code reads through the [`DocumentStore`] trait so the
//! MongoDB-backed [`MongoConnection`] can be swapped for a [`MemoryStore`]
//! in tests. [`fetch_all`] adds the deadline on top of either.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};

use crate::connection::MongoConnection;
use crate::error::DbError;

/// A stored document, passed through untyped.
pub type Record = Document;

/// Source of documents grouped by database and collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `database.collection`, in store-native order.
    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Record>, DbError>;
}

#[async_trait]
impl DocumentStore for MongoConnection {
    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Record>, DbError> {
        // The cursor is owned here; dropping it on any path (including
        // cancellation by a timeout) releases it on the server.
        let cursor = self.collection(database, collection).find(doc! {}).await?;
        let records: Vec<Record> = cursor.try_collect().await?;
        Ok(records)
    }
}

/// In-memory document store.
///
/// Uses `std::sync::RwLock` because no lock is held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<(String, String), Vec<Record>>>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Creates an empty store that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every read by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Appends `record` to `database.collection`.
    pub fn insert(&self, database: &str, collection: &str, record: Record) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collections
            .entry((database.to_string(), collection.to_string()))
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Record>, DbError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(collections
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Reads every document in `database.collection`, giving up after `limit`.
///
/// Query errors are returned unchanged.
///
/// # Errors
///
/// Returns `DbError::Timeout` if the read does not finish in time, or
/// whatever error the store reported.
pub async fn fetch_all(
    store: &dyn DocumentStore,
    database: &str,
    collection: &str,
    limit: Duration,
) -> Result<Vec<Record>, DbError> {
    match tokio::time::timeout(limit, store.find_all(database, collection)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                database,
                collection,
                ?limit,
                "fetch-all query timed out"
            );
            Err(DbError::Timeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_keeps_collections_apart() {
        let store = MemoryStore::new();
        store.insert("dashboard", "users", doc! { "name": "ada" });
        store.insert("dashboard", "audit", doc! { "action": "login" });
        store.insert("other", "users", doc! { "name": "grace" });

        let users = store.find_all("dashboard", "users").await.unwrap();
        assert_eq!(users, vec![doc! { "name": "ada" }]);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let records = store.find_all("dashboard", "missing").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_all_times_out_on_slow_store() {
        let store = MemoryStore::new().with_latency(Duration::from_secs(30));
        store.insert("dashboard", "users", doc! { "name": "ada" });

        let err = fetch_all(&store, "dashboard", "users", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_all_returns_records_within_deadline() {
        let store = MemoryStore::new().with_latency(Duration::from_secs(1));
        store.insert("dashboard", "users", doc! { "name": "ada" });
        store.insert("dashboard", "users", doc! { "name": "grace" });

        let records = fetch_all(&store, "dashboard", "users", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn fetch_all_accepts_unbounded_limit() {
        let store = MemoryStore::new();
        store.insert("dashboard", "users", doc! { "name": "ada" });

        let records = fetch_all(&store, "dashboard", "users", Duration::MAX)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}
