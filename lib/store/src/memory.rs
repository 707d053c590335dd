//! In-process document store.
//!
//! Holds documents in memory and serves live queries by re-running them
//! after every write to the queried collection. Nothing is persisted.

use crate::error::StoreError;
use crate::path::{CollectionPath, DocumentPath};
use crate::query::Query;
use crate::snapshot::{Document, Snapshot};
use crate::store::DocumentStore;
use async_trait::async_trait;
use pingster_core::subscription::{self, Publisher, Subscription};
use rootcause::Report;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};
use ulid::Ulid;

struct Watcher {
    query: Query,
    publisher: Publisher<Snapshot>,
}

#[derive(Default)]
struct Inner {
    documents: BTreeMap<DocumentPath, JsonValue>,
    watchers: Vec<Watcher>,
}

impl Inner {
    fn run(&self, query: &Query) -> Snapshot {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .map(|(path, data)| Document {
                path: path.clone(),
                data: data.clone(),
            })
            .filter(|document| query.matches(document))
            .collect();
        documents.sort_by(|a, b| query.compare(a, b));
        Snapshot { documents }
    }

    fn notify(&mut self, collection: &CollectionPath) {
        let snapshots: Vec<Option<Snapshot>> = self
            .watchers
            .iter()
            .map(|watcher| {
                (&watcher.query.collection == collection).then(|| self.run(&watcher.query))
            })
            .collect();

        let before = self.watchers.len();
        let mut snapshots = snapshots.into_iter();
        self.watchers.retain(|watcher| match snapshots.next().flatten() {
            Some(snapshot) => watcher.publisher.publish(snapshot),
            None => !watcher.publisher.is_closed(),
        });
        let pruned = before - self.watchers.len();
        if pruned > 0 {
            debug!(pruned, "dropped closed subscriptions");
        }
    }
}

/// A document store held entirely in memory.
///
/// Clones share the same documents and subscriptions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the record stored at a path, if any.
    #[must_use]
    pub fn get(&self, path: &DocumentPath) -> Option<JsonValue> {
        self.lock().documents.get(path).cloned()
    }

    /// Returns the current result set of a query without subscribing.
    #[must_use]
    pub fn query(&self, query: &Query) -> Snapshot {
        self.lock().run(query)
    }

    /// Returns the number of live subscriptions not yet known to be closed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .watchers
            .iter()
            .filter(|watcher| !watcher.publisher.is_closed())
            .count()
    }

    /// Stores a record, returning false without writing if `overwrite` is
    /// unset and the document exists.
    fn write(
        &self,
        path: &DocumentPath,
        record: JsonValue,
        overwrite: bool,
    ) -> Result<bool, Report<StoreError>> {
        if !record.is_object() {
            return Err(StoreError::InvalidRecord {
                reason: "records must be JSON objects".to_string(),
            }
            .into());
        }
        let mut inner = self.lock();
        if !overwrite && inner.documents.contains_key(path) {
            return Ok(false);
        }
        inner.documents.insert(path.clone(), record);
        inner.notify(&path.parent());
        Ok(true)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryStore")
            .field("documents", &inner.documents.len())
            .field("watchers", &inner.watchers.len())
            .finish()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[instrument(skip(self, record), fields(path = %path))]
    async fn set(&self, path: &DocumentPath, record: JsonValue) -> Result<(), Report<StoreError>> {
        self.write(path, record, true)?;
        debug!("document set");
        Ok(())
    }

    #[instrument(skip(self, record), fields(path = %path))]
    async fn create(
        &self,
        path: &DocumentPath,
        record: JsonValue,
    ) -> Result<bool, Report<StoreError>> {
        let created = self.write(path, record, false)?;
        debug!(created, "document create");
        Ok(created)
    }

    #[instrument(skip(self, record), fields(collection = %collection))]
    async fn add(
        &self,
        collection: &CollectionPath,
        record: JsonValue,
    ) -> Result<DocumentPath, Report<StoreError>> {
        let path = collection.doc(&Ulid::new().to_string())?;
        self.write(&path, record, true)?;
        debug!(id = path.id(), "document added");
        Ok(path)
    }

    #[instrument(skip(self, query), fields(collection = %query.collection))]
    async fn subscribe(&self, query: Query) -> Result<Subscription<Snapshot>, Report<StoreError>> {
        let (publisher, subscription) = subscription::channel();
        let mut inner = self.lock();
        publisher.publish(inner.run(&query));
        inner.watchers.push(Watcher { query, publisher });
        debug!(watchers = inner.watchers.len(), "subscription opened");
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;
    use futures::StreamExt;
    use serde_json::json;

    fn messages(chat: &str) -> CollectionPath {
        CollectionPath::root("chats")
            .and_then(|chats| chats.doc(chat))
            .and_then(|doc| doc.collection("messages"))
            .expect("valid path")
    }

    #[tokio::test]
    async fn set_replaces_document() {
        let store = MemoryStore::new();
        let path = DocumentPath::parse("users/a@x.com").expect("valid");

        store.set(&path, json!({"username": "a"})).await.unwrap();
        store.set(&path, json!({"username": "b"})).await.unwrap();

        assert_eq!(store.get(&path), Some(json!({"username": "b"})));
    }

    #[tokio::test]
    async fn create_refuses_existing_document() {
        let store = MemoryStore::new();
        let path = DocumentPath::parse("groups/GROUP_1").expect("valid");

        assert!(store.create(&path, json!({"name": "first"})).await.unwrap());
        assert!(!store.create(&path, json!({"name": "second"})).await.unwrap());

        assert_eq!(store.get(&path), Some(json!({"name": "first"})));
    }

    #[tokio::test]
    async fn rejects_non_object_records() {
        let store = MemoryStore::new();
        let path = DocumentPath::parse("users/a@x.com").expect("valid");
        assert!(store.set(&path, json!("scalar")).await.is_err());
        assert_eq!(store.get(&path), None);
    }

    #[tokio::test]
    async fn add_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let collection = messages("c1");

        let first = store.add(&collection, json!({"text": "a"})).await.unwrap();
        let second = store.add(&collection, json!({"text": "b"})).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.parent(), collection);
        assert_eq!(store.query(&Query::collection(collection)).len(), 2);
    }

    #[tokio::test]
    async fn subscription_delivers_current_then_every_change() {
        let store = MemoryStore::new();
        let collection = messages("c1");
        store
            .add(&collection, json!({"createdAt": "2024-01-01T00:00:00Z"}))
            .await
            .unwrap();

        let query =
            Query::collection(collection.clone()).order_by("createdAt", Direction::Descending);
        let mut subscription = store.subscribe(query).await.unwrap();

        let initial = subscription.next().await.expect("initial snapshot");
        assert_eq!(initial.len(), 1);

        store
            .add(&collection, json!({"createdAt": "2024-01-02T00:00:00Z"}))
            .await
            .unwrap();

        let updated = subscription.next().await.expect("updated snapshot");
        assert_eq!(updated.len(), 2);
        assert_eq!(
            updated.documents[0].data["createdAt"],
            json!("2024-01-02T00:00:00Z")
        );
    }

    #[tokio::test]
    async fn writes_elsewhere_do_not_notify() {
        let store = MemoryStore::new();
        let mut subscription = store
            .subscribe(Query::collection(messages("c1")))
            .await
            .unwrap();
        let _ = subscription.next().await;

        store.add(&messages("c2"), json!({"text": "hi"})).await.unwrap();
        subscription.close();

        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn closed_subscriptions_are_pruned() {
        let store = MemoryStore::new();
        let groups = CollectionPath::root("groups").expect("valid");
        let mut subscription = store
            .subscribe(Query::collection(groups.clone()).array_contains("members", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(store.subscriber_count(), 1);

        subscription.close();
        assert_eq!(store.subscriber_count(), 0);

        store
            .set(&groups.doc("GROUP_1").unwrap(), json!({"members": ["a@x.com"]}))
            .await
            .unwrap();
        assert_eq!(store.lock().watchers.len(), 0);
    }
}
