//! Entity codec and search traits
//!
//! Every collection record implements [`Entity`] to move between its typed
//! form and the store's field map, and [`Searchable`] to expose the fields a
//! list screen filters on.

use crate::document::{Document, DocumentId, Fields};
use crate::error::ModelError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed record stored in a named collection
///
/// Implementors keep their key in a `#[serde(skip)]` field so that
/// [`Entity::to_fields`] never writes the key into the document body.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the document store
    const COLLECTION: &'static str;

    /// Store-assigned key
    fn id(&self) -> &DocumentId;

    /// Replace the key (after the store assigns one)
    fn set_id(&mut self, id: DocumentId);

    /// Serialize to a field map
    ///
    /// # Errors
    /// `ModelError::NotAnObject` if the entity is not a JSON object
    fn to_fields(&self) -> Result<Fields, ModelError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            _ => Err(ModelError::NotAnObject(Self::COLLECTION)),
        }
    }

    /// Decode a stored document
    ///
    /// # Errors
    /// `ModelError::Decode` if the fields do not match the entity shape
    fn from_document(document: Document) -> Result<Self, ModelError> {
        let Document { id, fields } = document;
        let mut entity: Self = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| ModelError::decode(Self::COLLECTION, id.as_str(), e))?;
        entity.set_id(id);
        Ok(entity)
    }
}

/// Record exposing the text fields a client-side filter matches against
pub trait Searchable {
    /// Field values in a fixed order
    fn search_fields(&self) -> Vec<&str>;
}
