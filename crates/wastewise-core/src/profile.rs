//! Cached user profile lookups
//!
//! Headers and lists show the signed-in user's name on every screen; this
//! directory keeps recently read `users/{uid}` documents in a moka cache.

use crate::error::CoreError;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use wastewise_model::{DocumentId, UserProfile};
use wastewise_store::{DocumentStore, EntityStoreExt};

/// Default number of cached profiles
pub const DEFAULT_CAPACITY: u64 = 1_000;

/// Default time a cached profile stays valid
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Profile reads through a time-limited cache
#[derive(Clone)]
pub struct ProfileDirectory {
    store: Arc<dyn DocumentStore>,
    cache: Cache<DocumentId, UserProfile>,
}

impl ProfileDirectory {
    /// Create directory with default capacity and TTL
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_ttl(store, DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Create directory with explicit limits
    #[must_use]
    pub fn with_ttl(store: Arc<dyn DocumentStore>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            store,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Profile for `uid`, from cache or store
    ///
    /// Missing profiles are not cached.
    ///
    /// # Errors
    /// The store failure
    pub async fn lookup(&self, uid: &DocumentId) -> Result<Option<UserProfile>, CoreError> {
        if let Some(cached) = self.cache.get(uid).await {
            return Ok(Some(cached));
        }

        let profile = self.store.fetch::<UserProfile>(uid).await?;
        if let Some(profile) = &profile {
            self.cache.insert(uid.clone(), profile.clone()).await;
        }
        Ok(profile)
    }

    /// Display name for `uid`
    ///
    /// # Errors
    /// The store failure
    pub async fn display_name(&self, uid: &DocumentId) -> Result<Option<String>, CoreError> {
        Ok(self.lookup(uid).await?.map(|profile| profile.name))
    }

    /// Write a profile at its uid and refresh the cache
    ///
    /// # Errors
    /// The store failure
    pub async fn save(&self, profile: &UserProfile) -> Result<(), CoreError> {
        self.store.put(profile).await?;
        self.cache.insert(profile.uid.clone(), profile.clone()).await;
        Ok(())
    }

    /// Drop a cached profile
    pub async fn invalidate(&self, uid: &DocumentId) {
        self.cache.invalidate(uid).await;
    }

    /// Whether `uid` is currently cached
    pub async fn is_cached(&self, uid: &DocumentId) -> bool {
        self.cache.get(uid).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wastewise_model::UserType;
    use wastewise_store::{MemoryStore, StoreError, StoreOp};
    use wastewise_test_utils::{create_profile, seeded_store};

    #[tokio::test]
    async fn lookup_caches_found_profiles() {
        let profile = create_profile("u1", "Kamal Perera", UserType::Customer);
        let store = seeded_store(&[profile.clone()]).await;
        let directory = ProfileDirectory::new(store.clone());

        assert_eq!(directory.lookup(&"u1".into()).await.unwrap(), Some(profile));
        assert!(directory.is_cached(&"u1".into()).await);

        // Served from cache while the store is unreachable
        store.set_offline(true);
        assert_eq!(
            directory.display_name(&"u1".into()).await.unwrap(),
            Some("Kamal Perera".to_string())
        );
    }

    #[tokio::test]
    async fn missing_profiles_are_not_cached() {
        let store = Arc::new(MemoryStore::new());
        let directory = ProfileDirectory::new(store.clone());

        assert_eq!(directory.lookup(&"ghost".into()).await.unwrap(), None);
        assert!(!directory.is_cached(&"ghost".into()).await);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreOp::Get, StoreError::NetworkUnavailable);
        let directory = ProfileDirectory::new(store);

        assert!(matches!(
            directory.lookup(&"u1".into()).await,
            Err(CoreError::Store(StoreError::NetworkUnavailable))
        ));
    }

    #[tokio::test]
    async fn save_refreshes_cache() {
        let store = Arc::new(MemoryStore::new());
        let directory = ProfileDirectory::new(store);
        let mut profile = create_profile("u2", "Old Name", UserType::Admin);
        directory.save(&profile).await.unwrap();

        profile.name = "New Name".into();
        directory.save(&profile).await.unwrap();
        assert_eq!(
            directory.display_name(&"u2".into()).await.unwrap(),
            Some("New Name".to_string())
        );
    }
}
