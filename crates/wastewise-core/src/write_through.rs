//! Write-through record writes
//!
//! A write goes to the store first. Only when the store accepts it is the
//! matching optimistic mutation applied to the attached live view, ahead of
//! the snapshot that will confirm it. A rejected write leaves the view
//! untouched and produces exactly one error notice.

use crate::error::CoreError;
use crate::notify::{Notice, Notifier};
use std::sync::Arc;
use wastewise_live::{LiveCollectionView, OptimisticMutation};
use wastewise_model::{DocumentId, Entity, Fields, Searchable};
use wastewise_store::{DocumentStore, EntityStoreExt, StoreError};

/// Store writer for one entity type
pub struct RecordWriter<T: Entity + Searchable> {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    view: Option<Arc<LiveCollectionView<T>>>,
    noun: &'static str,
}

impl<T: Entity + Searchable> RecordWriter<T> {
    /// Create writer; `noun` names the record in notices ("location")
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>, noun: &'static str) -> Self {
        Self {
            store,
            notifier,
            view: None,
            noun,
        }
    }

    /// Mirror successful writes into a live view
    #[must_use]
    pub fn with_view(mut self, view: Arc<LiveCollectionView<T>>) -> Self {
        self.view = Some(view);
        self
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Notice sink
    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Attached live view
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<&Arc<LiveCollectionView<T>>> {
        self.view.as_ref()
    }

    /// Create a new record; returns it with its store-assigned key
    ///
    /// # Errors
    /// `CoreError::Store` if the store rejects the write
    pub async fn create(&self, mut record: T) -> Result<T, CoreError> {
        match self.store.insert(&record).await {
            Ok(id) => {
                record.set_id(id);
                tracing::info!(collection = T::COLLECTION, id = %record.id(), "record created");
                self.mirror(OptimisticMutation::Insert(record.clone()));
                self.succeed("added");
                Ok(record)
            }
            Err(error) => Err(self.fail("add", error)),
        }
    }

    /// Overwrite every field of an existing record
    ///
    /// # Errors
    /// `CoreError::Store` if the store rejects the write
    pub async fn update(&self, record: &T) -> Result<(), CoreError> {
        match self.store.replace(record).await {
            Ok(()) => {
                tracing::info!(collection = T::COLLECTION, id = %record.id(), "record updated");
                self.mirror(OptimisticMutation::Update(record.clone()));
                self.succeed("updated");
                Ok(())
            }
            Err(error) => Err(self.fail("update", error)),
        }
    }

    /// Merge `partial` into a record; `updated` is its expected new state
    ///
    /// # Errors
    /// `CoreError::Store` if the store rejects the write
    pub async fn patch(&self, id: &DocumentId, partial: Fields, updated: Option<T>) -> Result<(), CoreError> {
        match self.store.update_one(T::COLLECTION, id, partial).await {
            Ok(()) => {
                tracing::info!(collection = T::COLLECTION, %id, "record patched");
                if let Some(record) = updated {
                    self.mirror(OptimisticMutation::Update(record));
                }
                self.succeed("updated");
                Ok(())
            }
            Err(error) => Err(self.fail("update", error)),
        }
    }

    /// Delete a record
    ///
    /// # Errors
    /// `CoreError::Store` if the store rejects the write
    pub async fn delete(&self, id: &DocumentId) -> Result<(), CoreError> {
        match self.store.delete_one(T::COLLECTION, id).await {
            Ok(()) => {
                tracing::info!(collection = T::COLLECTION, %id, "record deleted");
                self.mirror(OptimisticMutation::Remove(id.clone()));
                self.succeed("deleted");
                Ok(())
            }
            Err(error) => Err(self.fail("delete", error)),
        }
    }

    fn mirror(&self, mutation: OptimisticMutation<T>) {
        if let Some(view) = &self.view {
            if let Err(error) = view.apply_optimistic(mutation) {
                tracing::debug!(collection = T::COLLECTION, %error, "optimistic update skipped");
            }
        }
    }

    fn succeed(&self, verb: &str) {
        self.notifier
            .notify(Notice::success(format!("{} {verb} successfully!", capitalize(self.noun))));
    }

    fn fail(&self, action: &str, error: StoreError) -> CoreError {
        tracing::error!(collection = T::COLLECTION, action, %error, "write failed");
        self.notifier.notify(Notice::error(format!(
            "Failed to {action} {}. Please try again.",
            self.noun
        )));
        CoreError::Store(error)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MockNotifier, NoticeLevel};
    use mockall::predicate::function;
    use pretty_assertions::assert_eq;
    use wastewise_live::{ViewConfig, ViewPhase};
    use wastewise_model::GarbagePlace;
    use wastewise_store::{MemoryStore, StoreOp};
    use wastewise_test_utils::{create_place, sample_places, seeded_store, settle, wait_for_phase};

    async fn ready_view(store: &Arc<MemoryStore>) -> Arc<LiveCollectionView<GarbagePlace>> {
        let view = Arc::new(LiveCollectionView::new(store.clone(), ViewConfig::default()));
        view.open().await.unwrap();
        wait_for_phase(&*view, ViewPhase::Ready).await;
        view
    }

    #[tokio::test]
    async fn failed_create_leaves_mirror_and_notifies_once() {
        let store = seeded_store(&sample_places()).await;
        let view = ready_view(&store).await;
        let before = view.snapshot();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(function(|n: &Notice| n.level == NoticeLevel::Error))
            .times(1)
            .return_const(());

        let writer = RecordWriter::new(store.clone(), Arc::new(notifier), "location").with_view(view.clone());
        store.fail_next(StoreOp::Create, StoreError::NetworkUnavailable);

        let result = writer.create(create_place("", "3 New Rd", "Organic")).await;
        assert!(matches!(result, Err(CoreError::Store(StoreError::NetworkUnavailable))));

        settle().await;
        assert_eq!(view.snapshot(), before);
        assert_eq!(store.len(GarbagePlace::COLLECTION), 2);
    }

    #[tokio::test]
    async fn successful_create_is_visible_before_snapshot() {
        let store = seeded_store(&sample_places()).await;
        let view = ready_view(&store).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(function(|n: &Notice| {
                n.level == NoticeLevel::Success && n.message == "Location added successfully!"
            }))
            .times(1)
            .return_const(());

        let writer = RecordWriter::new(store.clone(), Arc::new(notifier), "location").with_view(view.clone());
        let created = writer.create(create_place("", "3 New Rd", "Organic")).await.unwrap();

        assert!(!created.id.is_unassigned());
        assert!(view.find(&created.id).is_some());

        settle().await;
        assert_eq!(view.snapshot().records.len(), 3);
    }

    #[tokio::test]
    async fn failed_delete_keeps_record() {
        let store = seeded_store(&sample_places()).await;
        let view = ready_view(&store).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(function(|n: &Notice| n.message == "Failed to delete location. Please try again."))
            .times(1)
            .return_const(());

        let writer = RecordWriter::new(store.clone(), Arc::new(notifier), "location").with_view(view.clone());
        store.fail_next(StoreOp::Delete, StoreError::PermissionDenied("GarbagePlaces".into()));

        assert!(writer.delete(&"1".into()).await.is_err());
        assert!(view.find(&"1".into()).is_some());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("location"), "Location");
        assert_eq!(capitalize(""), "");
    }
}
