//! Driver schedules

use crate::error::CoreError;
use crate::notify::Notice;
use crate::write_through::RecordWriter;
use chrono::{SecondsFormat, Utc};
use wastewise_model::{DocumentId, DriverDetail, DriverForm};
use wastewise_store::EntityStoreExt;

/// Schedule, reschedule, remove and list driver details
pub struct DriverScheduleService {
    writer: RecordWriter<DriverDetail>,
}

impl DriverScheduleService {
    /// Create service over a writer
    #[must_use]
    pub fn new(writer: RecordWriter<DriverDetail>) -> Self {
        Self { writer }
    }

    /// Validate and store a new schedule stamped with the current time
    ///
    /// # Errors
    /// `CoreError::Validation` without touching the store, or the store failure
    pub async fn schedule(&self, form: &DriverForm) -> Result<DriverDetail, CoreError> {
        let mut detail = form.validate()?;
        detail.cdate = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.writer.create(detail).await
    }

    /// Validate and overwrite a schedule, keeping its creation date
    ///
    /// # Errors
    /// `CoreError::Validation` without touching the store, or the store failure
    pub async fn reschedule(&self, existing: &DriverDetail, form: &DriverForm) -> Result<DriverDetail, CoreError> {
        let mut detail = form.validate()?;
        detail.id = existing.id.clone();
        detail.cdate = existing.cdate.clone();
        self.writer.update(&detail).await?;
        Ok(detail)
    }

    /// Delete a schedule
    ///
    /// # Errors
    /// The store failure
    pub async fn remove(&self, id: &DocumentId) -> Result<(), CoreError> {
        self.writer.delete(id).await
    }

    /// Every schedule, newest first
    ///
    /// # Errors
    /// The store failure, after an error notice
    pub async fn list(&self) -> Result<Vec<DriverDetail>, CoreError> {
        match self.writer.store().fetch_all::<DriverDetail>().await {
            Ok(mut details) => {
                details.sort_by(|a, b| b.cdate.cmp(&a.cdate));
                Ok(details)
            }
            Err(error) => {
                tracing::warn!(%error, "driver detail listing failed");
                self.writer
                    .notifier()
                    .notify(Notice::error("Failed to load driver details"));
                Err(CoreError::Store(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use wastewise_store::{MemoryStore, StoreError, StoreOp};
    use wastewise_test_utils::valid_driver_form;

    fn service_with(store: Arc<MemoryStore>, notifier: Arc<RecordingNotifier>) -> DriverScheduleService {
        DriverScheduleService::new(RecordWriter::new(store, notifier, "driver detail"))
    }

    fn service() -> DriverScheduleService {
        service_with(Arc::new(MemoryStore::new()), Arc::new(RecordingNotifier::new()))
    }

    #[tokio::test]
    async fn schedule_stamps_creation_date() {
        let service = service();
        let detail = service.schedule(&valid_driver_form()).await.unwrap();

        assert!(chrono::DateTime::parse_from_rfc3339(&detail.cdate).is_ok());
        assert_eq!(detail.vehicle_number, "wp-ab-1234");
        assert_eq!(service.list().await.unwrap(), vec![detail]);
    }

    #[tokio::test]
    async fn reschedule_keeps_creation_date() {
        let service = service();
        let original = service.schedule(&valid_driver_form()).await.unwrap();

        let mut form = DriverForm::from_detail(&original);
        form.leaving_time = "12:15".into();
        let updated = service.reschedule(&original, &form).await.unwrap();

        assert_eq!(updated.cdate, original.cdate);
        assert_eq!(updated.leaving_time, "12:15");
        assert_eq!(service.list().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn blank_leaving_is_rejected() {
        let service = service();
        let mut form = valid_driver_form();
        form.leaving_time = "  ".into();

        let err = service.schedule(&form).await.unwrap_err();
        assert_eq!(
            err.validation_errors().and_then(|e| e.get("leavingTime")),
            Some("Leaving date is required")
        );
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_listing_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = service_with(store.clone(), notifier.clone());
        store.fail_next(StoreOp::List, StoreError::NetworkUnavailable);

        assert!(matches!(
            service.list().await,
            Err(CoreError::Store(StoreError::NetworkUnavailable))
        ));
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
        assert_eq!(
            notifier.last().map(|n| n.message),
            Some("Failed to load driver details".to_string())
        );
    }
}
