//! Error types for the model crate

/// Errors converting between entities and stored documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Field values do not match the entity shape
    #[error("cannot decode {collection} document {id}: {source}")]
    Decode {
        /// Collection the document came from
        collection: &'static str,
        /// Document key
        id: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Entity failed to serialize
    #[error("cannot encode entity: {0}")]
    Encode(#[from] serde_json::Error),

    /// Entity serialized to something other than a JSON object
    #[error("entity of {0} did not serialize to an object")]
    NotAnObject(&'static str),
}

impl ModelError {
    /// Create decode error for a document
    pub fn decode(collection: &'static str, id: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            collection,
            id: id.into(),
            source,
        }
    }
}
