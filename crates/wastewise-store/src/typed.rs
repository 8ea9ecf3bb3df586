//! Typed access on top of any [`DocumentStore`]

use crate::document_store::DocumentStore;
use crate::error::StoreError;
use wastewise_model::{DocumentId, Entity};

/// Entity-level helpers for every document store
#[async_trait::async_trait]
pub trait EntityStoreExt: DocumentStore {
    /// Read and decode one entity
    async fn fetch<T: Entity>(&self, id: &DocumentId) -> Result<Option<T>, StoreError> {
        match self.get_one(T::COLLECTION, id).await? {
            Some(document) => Ok(Some(T::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Read and decode a whole collection once
    ///
    /// Fails on the first malformed document.
    async fn fetch_all<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let documents = self.list(T::COLLECTION).await?;
        documents
            .into_iter()
            .map(|d| T::from_document(d).map_err(StoreError::from))
            .collect()
    }

    /// Create a new document from an entity, ignoring its current key
    async fn insert<T: Entity>(&self, entity: &T) -> Result<DocumentId, StoreError> {
        let fields = entity.to_fields()?;
        self.create_one(T::COLLECTION, fields).await
    }

    /// Write an entity at its own key, creating or overwriting
    async fn put<T: Entity>(&self, entity: &T) -> Result<(), StoreError> {
        let fields = entity.to_fields()?;
        self.set_one(T::COLLECTION, entity.id(), fields).await
    }

    /// Overwrite every field of an existing entity
    async fn replace<T: Entity>(&self, entity: &T) -> Result<(), StoreError> {
        let fields = entity.to_fields()?;
        self.update_one(T::COLLECTION, entity.id(), fields).await
    }
}

impl<S: DocumentStore + ?Sized> EntityStoreExt for S {}
