//! Document store contract
//!
//! A hosted, schema-less database addressed by collection name and document
//! key. Live subscriptions deliver the *entire* collection on every change
//! (snapshot model, not diffs).

use crate::error::StoreError;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use wastewise_model::{Document, DocumentId, Fields};

/// One delivery on a live subscription
pub type SnapshotEvent = Result<Vec<Document>, StoreError>;

/// Identifier of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Live subscription to one collection
///
/// A stream of snapshots in delivery order. Dropping it (or calling
/// [`Subscription::unsubscribe`]) releases the listener.
pub struct Subscription {
    id: SubscriptionId,
    collection: String,
    events: mpsc::UnboundedReceiver<SnapshotEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create subscription over a snapshot channel
    ///
    /// `release` runs exactly once, when the subscription is dropped or
    /// explicitly unsubscribed.
    pub fn new(
        id: SubscriptionId,
        collection: impl Into<String>,
        events: mpsc::UnboundedReceiver<SnapshotEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            collection: collection.into(),
            events,
            release: Some(Box::new(release)),
        }
    }

    /// Listener identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Subscribed collection
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Release the listener now
    pub fn unsubscribe(mut self) {
        self.release_listener();
    }

    fn release_listener(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
        self.events.close();
    }
}

impl Stream for Subscription {
    type Item = SnapshotEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().events.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_listener();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("collection", &self.collection)
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Hosted document database
///
/// Implementations must deliver an initial snapshot to every new
/// subscription and a fresh snapshot after every write to the collection.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a live subscription to a collection
    async fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError>;

    /// Read one document; `Ok(None)` if it does not exist
    async fn get_one(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Read the whole collection once
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Create a document with a store-assigned key
    async fn create_one(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Create or overwrite a document at a caller-chosen key
    async fn set_one(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError>;

    /// Merge fields into an existing document
    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        partial: Fields,
    ) -> Result<(), StoreError>;

    /// Delete an existing document
    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;
}
