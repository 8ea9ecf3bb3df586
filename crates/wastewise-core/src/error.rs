//! Service-level errors

use wastewise_live::ViewError;
use wastewise_model::{ModelError, ValidationErrors};
use wastewise_store::{ConfigError, IdentityError, StoreError};

/// Failures surfaced by services, session and CLI
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Form input rejected before any store call
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Record could not be encoded or decoded
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Document store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Identity service failure
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Startup configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Live view failure
    #[error(transparent)]
    View(#[from] ViewError),

    /// Record looked up by key does not exist
    #[error("{collection}/{id} not found")]
    NotFound { collection: &'static str, id: String },

    /// Signed-in principal has no profile document
    #[error("User profile not found")]
    ProfileMissing(String),

    /// Operation needs a signed-in user
    #[error("not signed in")]
    NotSignedIn,

    /// Operation needs an administrator
    #[error("administrator access required")]
    Forbidden,

    /// Report requested for an empty collection
    #[error("Add garbage bins to generate reports")]
    EmptyReport,

    /// Seed file could not be read
    #[error("seed file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid JSON for the expected records
    #[error("seed data: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the error came from input validation
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Field errors, if this is a validation failure
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
