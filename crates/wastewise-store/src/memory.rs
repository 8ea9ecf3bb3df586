//! In-process document store
//!
//! Collections keep insertion order. Every write re-delivers the full
//! collection to its listeners while the collection lock is held, so
//! listeners never observe snapshots out of order.
//!
//! Failures can be injected for exercising error paths: offline mode,
//! denied collections, queued one-shot failures per operation, and errors
//! pushed into live subscriptions.

use crate::document_store::{DocumentStore, SnapshotEvent, Subscription, SubscriptionId};
use crate::error::StoreError;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use ulid::Ulid;
use wastewise_model::{Document, DocumentId, Fields};

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `subscribe`
    Subscribe,
    /// `get_one`
    Get,
    /// `list`
    List,
    /// `create_one`
    Create,
    /// `set_one`
    Set,
    /// `update_one`
    Update,
    /// `delete_one`
    Delete,
}

type Collection = IndexMap<DocumentId, Fields>;

#[derive(Debug)]
struct Listener {
    collection: String,
    sender: mpsc::UnboundedSender<SnapshotEvent>,
}

#[derive(Debug, Default)]
struct Faults {
    offline: bool,
    denied: HashSet<String>,
    queued: VecDeque<(StoreOp, StoreError)>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: RwLock<HashMap<String, Collection>>,
    listeners: DashMap<SubscriptionId, Listener>,
    faults: Mutex<Faults>,
    next_listener: AtomicU64,
}

impl Inner {
    fn check(&self, op: StoreOp, collection: &str) -> Result<(), StoreError> {
        let mut faults = self.faults.lock();
        if let Some(idx) = faults.queued.iter().position(|(queued, _)| *queued == op) {
            if let Some((_, err)) = faults.queued.remove(idx) {
                return Err(err);
            }
        }
        if faults.offline {
            return Err(StoreError::NetworkUnavailable);
        }
        if faults.denied.contains(collection) {
            return Err(StoreError::PermissionDenied(collection.to_string()));
        }
        Ok(())
    }

    /// Deliver the current contents to every listener of `collection`.
    /// Listeners whose receiver is gone are dropped.
    fn broadcast(&self, collection: &str, documents: &Collection) {
        let snapshot = to_documents(documents);
        self.listeners.retain(|_, listener| {
            listener.collection != collection || listener.sender.send(Ok(snapshot.clone())).is_ok()
        });
    }
}

fn to_documents(collection: &Collection) -> Vec<Document> {
    collection
        .iter()
        .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
        .collect()
}

/// Document store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a collection
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner
            .collections
            .read()
            .get(collection)
            .map(to_documents)
            .unwrap_or_default()
    }

    /// Number of documents in a collection
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .get(collection)
            .map_or(0, IndexMap::len)
    }

    /// Number of live listeners on a collection
    #[must_use]
    pub fn listener_count(&self, collection: &str) -> usize {
        self.inner
            .listeners
            .iter()
            .filter(|entry| entry.value().collection == collection)
            .count()
    }

    /// Fail every operation with `NetworkUnavailable` while set
    pub fn set_offline(&self, offline: bool) {
        self.inner.faults.lock().offline = offline;
    }

    /// Fail every operation on a collection with `PermissionDenied`
    pub fn deny(&self, collection: &str) {
        self.inner.faults.lock().denied.insert(collection.to_string());
    }

    /// Lift a previous [`MemoryStore::deny`]
    pub fn allow(&self, collection: &str) {
        self.inner.faults.lock().denied.remove(collection);
    }

    /// Fail the next call of `op` with `error`
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.inner.faults.lock().queued.push_back((op, error));
    }

    /// Deliver `error` to every live subscription on a collection and end them
    pub fn push_error(&self, collection: &str, error: StoreError) {
        let _guard = self.inner.collections.write();
        self.inner.listeners.retain(|_, listener| {
            if listener.collection == collection {
                let _ = listener.sender.send(Err(error.clone()));
                false
            } else {
                true
            }
        });
    }

    fn mutate<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Collection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut collections = self.inner.collections.write();
        let documents = collections.entry(collection.to_string()).or_default();
        let result = f(documents)?;
        self.inner.broadcast(collection, documents);
        Ok(result)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        self.inner.check(StoreOp::Subscribe, collection)?;

        let id = SubscriptionId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        let (sender, events) = mpsc::unbounded_channel();

        {
            let collections = self.inner.collections.read();
            let initial = collections.get(collection).map(to_documents).unwrap_or_default();
            // Receiver is alive here; the send cannot fail.
            let _ = sender.send(Ok(initial));
            self.inner.listeners.insert(
                id,
                Listener {
                    collection: collection.to_string(),
                    sender,
                },
            );
        }
        tracing::debug!(%id, collection, "listener registered");

        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(id, collection, events, move || {
            if let Some(inner) = registry.upgrade() {
                inner.listeners.remove(&id);
                tracing::debug!(%id, "listener released");
            }
        }))
    }

    async fn get_one(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.inner.check(StoreOp::Get, collection)?;
        let collections = self.inner.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone())))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.check(StoreOp::List, collection)?;
        Ok(self.documents(collection))
    }

    async fn create_one(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        self.inner.check(StoreOp::Create, collection)?;
        let id = DocumentId::new(Ulid::new().to_string());
        self.mutate(collection, |docs| {
            docs.insert(id.clone(), fields);
            Ok(())
        })?;
        Ok(id)
    }

    async fn set_one(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        self.inner.check(StoreOp::Set, collection)?;
        self.mutate(collection, |docs| {
            docs.insert(id.clone(), fields);
            Ok(())
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        partial: Fields,
    ) -> Result<(), StoreError> {
        self.inner.check(StoreOp::Update, collection)?;
        self.mutate(collection, |docs| {
            let existing = docs
                .get_mut(id)
                .ok_or_else(|| StoreError::not_found(collection, id.as_str()))?;
            existing.extend(partial);
            Ok(())
        })
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        self.inner.check(StoreOp::Delete, collection)?;
        self.mutate(collection, |docs| {
            docs.shift_remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found(collection, id.as_str()))
        })
    }
}
