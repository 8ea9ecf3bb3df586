//! Error types for store, identity and configuration
//!
//! Store errors are `Clone` so a single failure can be both reported to the
//! caller and delivered to a live subscription.

use wastewise_model::ModelError;

/// Document store failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Caller is not allowed to touch the collection
    #[error("permission denied on {0}")]
    PermissionDenied(String),

    /// Document does not exist
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Backing service unreachable
    #[error("network unavailable")]
    NetworkUnavailable,

    /// Stored fields do not match the expected shape
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Any other backend failure
    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create not-found error
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Short message suitable for an alert or banner
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "You do not have permission to view this data",
            Self::NotFound { .. } => "The requested record no longer exists",
            Self::NetworkUnavailable => "Network unavailable. Check your connection and try again",
            Self::Malformed(_) | Self::Internal(_) => "Something went wrong. Please try again",
        }
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Identity service failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Unknown email or wrong password
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Account already registered
    #[error("email already in use: {0}")]
    EmailInUse(String),

    /// Password rejected by the service
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
}

/// Startup configuration failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required values absent or blank
    #[error("missing store configuration values for: {}", .0.join(", "))]
    Missing(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::not_found("GarbagePlaces", "p1");
        assert_eq!(err.to_string(), "document not found: GarbagePlaces/p1");
    }

    #[test]
    fn user_messages_hide_details() {
        assert_eq!(
            StoreError::PermissionDenied("users".into()).user_message(),
            "You do not have permission to view this data"
        );
        assert_eq!(
            StoreError::Internal("disk full".into()).user_message(),
            "Something went wrong. Please try again"
        );
    }

    #[test]
    fn config_error_lists_every_key() {
        let err = ConfigError::Missing(vec!["A".into(), "B".into()]);
        assert_eq!(err.to_string(), "missing store configuration values for: A, B");
    }

    #[test]
    fn model_error_becomes_malformed() {
        let err: StoreError = ModelError::NotAnObject("users").into();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
