//! Garbage place management

use crate::error::CoreError;
use crate::notify::Notice;
use crate::write_through::RecordWriter;
use wastewise_model::{DocumentId, Entity, GarbagePlace, PlaceForm};
use wastewise_store::EntityStoreExt;

/// Add, edit, remove and load garbage places
pub struct PlaceService {
    writer: RecordWriter<GarbagePlace>,
}

impl PlaceService {
    /// Create service over a writer
    #[must_use]
    pub fn new(writer: RecordWriter<GarbagePlace>) -> Self {
        Self { writer }
    }

    /// Validate and store a new place
    ///
    /// # Errors
    /// `CoreError::Validation` without touching the store, or the store failure
    pub async fn add(&self, form: &PlaceForm) -> Result<GarbagePlace, CoreError> {
        let place = form.validate()?;
        self.writer.create(place).await
    }

    /// Validate and overwrite an existing place
    ///
    /// # Errors
    /// `CoreError::Validation` without touching the store, or the store failure
    pub async fn edit(&self, id: &DocumentId, form: &PlaceForm) -> Result<GarbagePlace, CoreError> {
        let mut place = form.validate()?;
        place.id = id.clone();
        self.writer.update(&place).await?;
        Ok(place)
    }

    /// Delete a place
    ///
    /// # Errors
    /// The store failure
    pub async fn remove(&self, id: &DocumentId) -> Result<(), CoreError> {
        self.writer.delete(id).await
    }

    /// Read one place for the edit screen
    ///
    /// # Errors
    /// `CoreError::NotFound` or the store failure; both raise an error notice
    pub async fn load(&self, id: &DocumentId) -> Result<GarbagePlace, CoreError> {
        let result = match self.writer.store().fetch::<GarbagePlace>(id).await {
            Ok(Some(place)) => Ok(place),
            Ok(None) => Err(CoreError::NotFound {
                collection: GarbagePlace::COLLECTION,
                id: id.to_string(),
            }),
            Err(error) => Err(CoreError::Store(error)),
        };
        if let Err(error) = &result {
            tracing::warn!(%id, %error, "place lookup failed");
            self.writer
                .notifier()
                .notify(Notice::error("Failed to load location details"));
        }
        result
    }

    /// Places whose address mentions `area`, for the customer locator
    ///
    /// An empty result raises an info notice.
    pub fn locate(&self, places: &[GarbagePlace], area: &str) -> Vec<GarbagePlace> {
        let found: Vec<GarbagePlace> = places.iter().filter(|p| p.serves_area(area)).cloned().collect();
        tracing::debug!(area, found = found.len(), "locator search");
        if found.is_empty() {
            self.writer
                .notifier()
                .notify(Notice::info("No garbage places found for your current location."));
        }
        found
    }

    /// Prefilled edit form for a stored place
    ///
    /// # Errors
    /// As for [`PlaceService::load`]
    pub async fn edit_form(&self, id: &DocumentId) -> Result<PlaceForm, CoreError> {
        self.load(id).await.map(|place| PlaceForm::from_place(&place))
    }
}
