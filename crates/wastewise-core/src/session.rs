//! Signed-in session
//!
//! Explicit replacement for a process-wide "current user": a context object
//! created once, filled on sign-in and emptied on sign-out, handed to every
//! component that needs to know who is using the app.

use crate::error::CoreError;
use crate::profile::ProfileDirectory;
use parking_lot::RwLock;
use std::sync::Arc;
use wastewise_model::{validation, UserProfile, ValidationErrors};
use wastewise_store::{IdentityService, Principal};

/// Screen to show after a successful sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Administrator dashboard
    AdminHome,
    /// Customer dashboard
    CustomerHome,
}

/// Principal and profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identity service principal
    pub principal: Principal,
    /// Profile stored under the principal's uid
    pub profile: UserProfile,
}

/// Holder of the current session
pub struct SessionContext {
    identity: Arc<dyn IdentityService>,
    profiles: ProfileDirectory,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Create an empty (signed-out) context
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityService>, profiles: ProfileDirectory) -> Self {
        Self {
            identity,
            profiles,
            current: RwLock::new(None),
        }
    }

    /// Validate, authenticate and load the profile
    ///
    /// A principal without a profile document is signed out again.
    ///
    /// # Errors
    /// - `CoreError::Validation` for a non-Gmail address or empty password
    /// - `CoreError::Identity` if authentication fails
    /// - `CoreError::ProfileMissing` if `users/{uid}` does not exist
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Landing, CoreError> {
        let mut errors = ValidationErrors::new();
        let email = errors.check("email", validation::sign_in_email(email));
        if password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()?;
        let email = email.unwrap_or_default();

        let principal = self.identity.sign_in(&email, password).await?;
        let profile = match self.profiles.lookup(&principal.uid).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(uid = %principal.uid, "signed in without a profile");
                self.abandon().await;
                return Err(CoreError::ProfileMissing(principal.uid.to_string()));
            }
            Err(error) => {
                self.abandon().await;
                return Err(error);
            }
        };

        let landing = if profile.is_admin() {
            Landing::AdminHome
        } else {
            Landing::CustomerHome
        };
        tracing::info!(uid = %principal.uid, ?landing, "signed in");
        *self.current.write() = Some(Session { principal, profile });
        Ok(landing)
    }

    /// End the session
    ///
    /// # Errors
    /// `CoreError::Identity` if the identity service fails; the local
    /// session is cleared regardless
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let previous = self.current.write().take();
        if let Some(session) = &previous {
            self.profiles.invalidate(&session.principal.uid).await;
            tracing::info!(uid = %session.principal.uid, "signed out");
        }
        self.identity.sign_out().await?;
        Ok(())
    }

    async fn abandon(&self) {
        if let Err(error) = self.identity.sign_out().await {
            tracing::warn!(%error, "sign-out after failed sign-in");
        }
    }

    /// Current session, if signed in
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// Current profile, if signed in
    #[must_use]
    pub fn current(&self) -> Option<UserProfile> {
        self.current.read().as_ref().map(|s| s.profile.clone())
    }

    /// Header name of the signed-in user
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.profile.name.clone())
    }

    /// Whether a user is signed in
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Profile of a signed-in administrator
    ///
    /// # Errors
    /// `CoreError::NotSignedIn` or `CoreError::Forbidden`
    pub fn require_admin(&self) -> Result<UserProfile, CoreError> {
        match self.current() {
            None => Err(CoreError::NotSignedIn),
            Some(profile) if profile.is_admin() => Ok(profile),
            Some(_) => Err(CoreError::Forbidden),
        }
    }

    /// Profile directory used for lookups
    #[must_use]
    pub fn profiles(&self) -> &ProfileDirectory {
        &self.profiles
    }
}
