//! Identity service contract and in-memory accounts

use crate::error::IdentityError;
use dashmap::DashMap;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use ulid::Ulid;
use wastewise_model::DocumentId;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authenticated user as known by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Stable user id, also the key of the profile document
    pub uid: DocumentId,
    /// Sign-in email
    pub email: String,
}

/// Hosted authentication service
#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Authenticate an existing account and make it current
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, IdentityError>;

    /// Register a new account and make it current
    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, IdentityError>;

    /// Forget the current principal
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Currently signed-in principal, if any
    fn current_principal(&self) -> Option<Principal>;
}

#[derive(Debug, Clone)]
struct Account {
    uid: DocumentId,
    email: String,
    digest: String,
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Identity service backed by an in-process account table
///
/// Emails are matched case-insensitively; passwords are kept as SHA-256
/// digests.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentity {
    accounts: Arc<DashMap<String, Account>>,
    current: Arc<RwLock<Option<Principal>>>,
}

impl MemoryIdentity {
    /// Create identity service with no accounts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with a fixed uid without signing in
    ///
    /// Used to seed accounts whose profile documents already exist.
    ///
    /// # Errors
    /// `EmailInUse` or `WeakPassword`, as for sign-up
    pub fn register(&self, uid: DocumentId, email: &str, password: &str) -> Result<Principal, IdentityError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword { min: MIN_PASSWORD_LEN });
        }
        let key = account_key(email);
        match self.accounts.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(IdentityError::EmailInUse(email.trim().to_string())),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let account = Account {
                    uid,
                    email: email.trim().to_string(),
                    digest: digest(password),
                };
                let principal = Principal {
                    uid: account.uid.clone(),
                    email: account.email.clone(),
                };
                slot.insert(account);
                Ok(principal)
            }
        }
    }

    /// Number of registered accounts
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

#[async_trait::async_trait]
impl IdentityService for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, IdentityError> {
        let principal = {
            let account = self
                .accounts
                .get(&account_key(email))
                .ok_or(IdentityError::InvalidCredentials)?;
            if account.digest != digest(password) {
                return Err(IdentityError::InvalidCredentials);
            }
            Principal {
                uid: account.uid.clone(),
                email: account.email.clone(),
            }
        };
        *self.current.write() = Some(principal.clone());
        tracing::debug!(uid = %principal.uid, "principal signed in");
        Ok(principal)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, IdentityError> {
        let principal = self.register(DocumentId::new(Ulid::new().to_string()), email, password)?;
        *self.current.write() = Some(principal.clone());
        tracing::debug!(uid = %principal.uid, "account registered");
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if let Some(principal) = self.current.write().take() {
            tracing::debug!(uid = %principal.uid, "principal signed out");
        }
        Ok(())
    }

    fn current_principal(&self) -> Option<Principal> {
        self.current.read().clone()
    }
}
