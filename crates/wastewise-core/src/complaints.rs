//! Complaint filing and resolution

use crate::error::CoreError;
use crate::write_through::RecordWriter;
use wastewise_model::{Complaint, ComplaintForm, ComplaintStatus, DocumentId, Fields};

/// File, resolve and delete complaints
pub struct ComplaintService {
    writer: RecordWriter<Complaint>,
}

impl ComplaintService {
    /// Create service over a writer
    #[must_use]
    pub fn new(writer: RecordWriter<Complaint>) -> Self {
        Self { writer }
    }

    /// Validate and file a new `Pending` complaint
    ///
    /// # Errors
    /// `CoreError::Validation` without touching the store, or the store failure
    pub async fn file(&self, form: &ComplaintForm) -> Result<Complaint, CoreError> {
        let complaint = form.validate()?;
        self.writer.create(complaint).await
    }

    /// Change only the status field
    ///
    /// # Errors
    /// The store failure (including not-found)
    pub async fn set_status(&self, id: &DocumentId, status: ComplaintStatus) -> Result<(), CoreError> {
        let mut partial = Fields::new();
        partial.insert("status".to_string(), serde_json::Value::from(status.as_str()));

        let updated = self.writer.view().and_then(|view| view.find(id)).map(|mut complaint| {
            complaint.status = status;
            complaint
        });
        self.writer.patch(id, partial, updated).await
    }

    /// Delete a complaint
    ///
    /// # Errors
    /// The store failure
    pub async fn remove(&self, id: &DocumentId) -> Result<(), CoreError> {
        self.writer.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use std::sync::Arc;
    use wastewise_model::Entity;
    use wastewise_store::{DocumentStore, EntityStoreExt, MemoryStore};
    use wastewise_test_utils::valid_complaint_form;

    #[tokio::test]
    async fn filed_complaint_starts_pending_and_resolves() {
        let store = Arc::new(MemoryStore::new());
        let writer = RecordWriter::new(store.clone(), Arc::new(RecordingNotifier::new()), "complaint");
        let service = ComplaintService::new(writer);

        let filed = service.file(&valid_complaint_form()).await.unwrap();
        assert_eq!(filed.status, ComplaintStatus::Pending);

        service.set_status(&filed.id, ComplaintStatus::Resolved).await.unwrap();
        let stored: Complaint = store.fetch(&filed.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ComplaintStatus::Resolved);
        assert_eq!(stored.full_name, filed.full_name);

        service.remove(&filed.id).await.unwrap();
        assert!(store.get_one(Complaint::COLLECTION, &filed.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolving_unknown_complaint_fails() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = ComplaintService::new(RecordWriter::new(store, notifier.clone(), "complaint"));

        assert!(service.set_status(&"nope".into(), ComplaintStatus::Resolved).await.is_err());
        assert_eq!(
            notifier.last().map(|n| n.message),
            Some("Failed to update complaint. Please try again.".to_string())
        );
    }
}
