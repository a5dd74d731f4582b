//! Document store abstraction.
//!
//! The ledger talks to its backing store through the [`Store`] trait: a
//! key-value document store addressed by `(collection, id)` whose writes
//! commit independently; there are **no multi-document transactions**. The
//! mutation protocol only uses the direct read/write methods; the
//! subscription stream exists for live report views and nothing else.
//!
//! Balance updates go through [`Store::increment`], an atomic
//! read-modify-write on a single numeric field. A plain `get`-then-`set`
//! would lose updates when two operations interleave on the same user;
//! `increment` has identical single-writer semantics without the race.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::ResultLedger;

/// A stored document: a flat JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("store write failed: {0}")]
    Write(String),
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// What happened to a document, pushed to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
}

/// Equality filters plus ordering and limit: the only query shapes the
/// ledger needs (`user == x`, `to == x`, newest first, top N).
#[derive(Clone, Debug, Default)]
pub struct Query {
    filters: Vec<(String, serde_json::Value)>,
    order_desc: Option<String>,
    limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_desc = Some(field.to_string());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, doc: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Writes a new document and returns its store-assigned id.
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Full replace; creates the document when absent.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Merges `patch` into an existing document.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError>;

    /// Atomically adds `delta` to a numeric field, treating a missing field
    /// as `0`. Returns `false` when the document does not exist.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<bool, StoreError>;

    /// Removing an absent document is a no-op.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn find(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Push-based change notifications for one collection. Subscribers
    /// re-read on each event; the receiver lags (and drops events) rather
    /// than block writers.
    fn subscribe(&self, collection: &str) -> broadcast::Receiver<ChangeEvent>;
}

/// In-process [`Store`] for the app binary and tests.
///
/// Every method commits on its own, mirroring the consistency model of the
/// hosted document store the ledger is designed against.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
    senders: Mutex<HashMap<String, broadcast::Sender<ChangeEvent>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, collection: &str, id: &str, kind: ChangeKind) {
        let Ok(senders) = self.senders.lock() else {
            return;
        };
        if let Some(sender) = senders.get(collection) {
            // Nobody listening is fine.
            let _ = sender.send(ChangeEvent {
                collection: collection.to_string(),
                id: id.to_string(),
                kind,
            });
        }
    }
}

fn value_order(a: &serde_json::Value, b: &serde_json::Value) -> std::cmp::Ordering {
    use serde_json::Value;
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        _ => std::cmp::Ordering::Equal,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), doc);
        }
        self.notify(collection, &id, ChangeKind::Created);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let created = {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc)
                .is_none()
        };
        let kind = if created {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        self.notify(collection, id, kind);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
            for (field, value) in patch {
                doc.insert(field, value);
            }
        }
        self.notify(collection, id, ChangeKind::Updated);
        Ok(())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<bool, StoreError> {
        {
            let mut collections = self.collections.write().await;
            let Some(doc) = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
            else {
                return Ok(false);
            };
            let current = doc.get(field).and_then(|v| v.as_i64()).unwrap_or(0);
            doc.insert(field.to_string(), (current + delta).into());
        }
        self.notify(collection, id, ChangeKind::Updated);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            self.notify(collection, id, ChangeKind::Deleted);
        }
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let collections = self.collections.read().await;
        let mut rows: Vec<(String, Document)> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| query.matches(doc))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(field) = &query.order_desc {
            rows.sort_by(|(_, a), (_, b)| {
                let a = a.get(field).unwrap_or(&serde_json::Value::Null);
                let b = b.get(field).unwrap_or(&serde_json::Value::Null);
                value_order(b, a)
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn subscribe(&self, collection: &str) -> broadcast::Receiver<ChangeEvent> {
        let Ok(mut senders) = self.senders.lock() else {
            // A poisoned lock means a writer panicked; hand back a channel
            // that will simply never fire.
            return broadcast::channel(1).1;
        };
        senders
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(64).0)
            .subscribe()
    }
}

pub(crate) fn to_document<T: Serialize>(value: &T) -> ResultLedger<Document> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(mut map)) => {
            // The document key lives outside the document.
            map.remove("id");
            Ok(map)
        }
        Ok(_) => Err(StoreError::Malformed("expected a JSON object".to_string()).into()),
        Err(err) => Err(StoreError::Malformed(err.to_string()).into()),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(doc: Document) -> ResultLedger<T> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|err| StoreError::Malformed(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fields: &[(&str, serde_json::Value)]) -> Document {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn increment_on_missing_document_reports_false() {
        let store = MemoryStore::new();
        assert!(!store.increment("users", "ghost", "balance", 100).await.unwrap());

        store
            .set("users", "amma", doc(&[("balance", 500.into())]))
            .await
            .unwrap();
        assert!(store.increment("users", "amma", "balance", -200).await.unwrap());
        let stored = store.get("users", "amma").await.unwrap().unwrap();
        assert_eq!(stored.get("balance").and_then(|v| v.as_i64()), Some(300));
    }

    #[tokio::test]
    async fn increment_defaults_missing_field_to_zero() {
        let store = MemoryStore::new();
        store.set("users", "kunji", Document::new()).await.unwrap();
        assert!(store.increment("users", "kunji", "balance", 42).await.unwrap());
        let stored = store.get("users", "kunji").await.unwrap().unwrap();
        assert_eq!(stored.get("balance").and_then(|v| v.as_i64()), Some(42));
    }

    #[tokio::test]
    async fn update_on_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("users", "ghost", doc(&[("email", "x@y.z".into())]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn find_filters_orders_and_limits() {
        let store = MemoryStore::new();
        for (id, user, date) in [
            ("a", "amma", "2025-01-01T00:00:00Z"),
            ("b", "amma", "2025-03-01T00:00:00Z"),
            ("c", "achan", "2025-02-01T00:00:00Z"),
        ] {
            store
                .set(
                    "transactions",
                    id,
                    doc(&[("user", user.into()), ("date", date.into())]),
                )
                .await
                .unwrap();
        }

        let rows = store
            .find(
                "transactions",
                Query::new().filter("user", "amma").order_by_desc("date"),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let rows = store
            .find(
                "transactions",
                Query::new().order_by_desc("date").limit(1),
            )
            .await
            .unwrap();
        assert_eq!(rows[0].0, "b");
    }

    #[tokio::test]
    async fn subscribe_receives_change_events() {
        let store = MemoryStore::new();
        let mut events = store.subscribe("transactions");

        let id = store.insert("transactions", Document::new()).await.unwrap();
        store.delete("transactions", &id).await.unwrap();

        let created = events.recv().await.unwrap();
        assert_eq!(created.kind, ChangeKind::Created);
        assert_eq!(created.id, id);
        let deleted = events.recv().await.unwrap();
        assert_eq!(deleted.kind, ChangeKind::Deleted);
    }
}
