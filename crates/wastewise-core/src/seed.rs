//! Seed data for the in-memory store
//!
//! A seed file is a JSON array of records in their stored (camelCase) shape.
//! An optional `"id"` key sets the document key; records without one are
//! numbered by position, starting at 1.

use crate::error::CoreError;
use std::path::Path;
use wastewise_model::{Document, DocumentId, Entity};
use wastewise_store::{DocumentStore, EntityStoreExt};

/// Decode records from seed JSON
///
/// # Errors
/// `CoreError::Json` if the text is not an array of objects, or
/// `CoreError::Model` if a record does not match the entity shape
pub fn parse_records<T: Entity>(json: &str) -> Result<Vec<T>, CoreError> {
    let raw: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(idx, mut fields)| {
            let id = match fields.remove("id") {
                Some(serde_json::Value::String(id)) => id,
                Some(other) => other.to_string(),
                None => (idx + 1).to_string(),
            };
            T::from_document(Document::new(DocumentId::new(id), fields)).map_err(CoreError::from)
        })
        .collect()
}

/// Read and decode a seed file
///
/// # Errors
/// `CoreError::Io` if the file cannot be read, otherwise as for [`parse_records`]
pub fn load_records<T: Entity>(path: &Path) -> Result<Vec<T>, CoreError> {
    let text = std::fs::read_to_string(path)?;
    let records = parse_records(&text)?;
    tracing::debug!(path = %path.display(), count = records.len(), collection = T::COLLECTION, "seed loaded");
    Ok(records)
}

/// Write records at their own keys
///
/// # Errors
/// The first store failure
pub async fn seed_store<T: Entity>(store: &dyn DocumentStore, records: &[T]) -> Result<usize, CoreError> {
    for record in records {
        store.put(record).await?;
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use wastewise_model::GarbagePlace;
    use wastewise_store::MemoryStore;

    const SEED: &str = r#"[
        {"id": "p1", "locationName": "Central Depot", "address": "12 Main St", "wasteType": "Organic",
         "capacity": "500", "contactPerson": "A. Perera", "phoneNumber": "0771234567"},
        {"locationName": "Park Bins", "address": "5 Park Ave", "wasteType": "Recyclable",
         "capacity": "80", "contactPerson": "B. Silva", "phoneNumber": "0711234567"}
    ]"#;

    #[test]
    fn explicit_and_positional_ids() {
        let places: Vec<GarbagePlace> = parse_records(SEED).unwrap();
        let ids: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "2"]);
        assert_eq!(places[1].location_name, "Park Bins");
    }

    #[test]
    fn wrong_shape_is_a_model_error() {
        let result = parse_records::<GarbagePlace>(r#"[{"address": 5}]"#);
        assert!(matches!(result, Err(CoreError::Model(_))));

        let result = parse_records::<GarbagePlace>(r#"{"not": "an array"}"#);
        assert!(matches!(result, Err(CoreError::Json(_))));
    }

    #[tokio::test]
    async fn load_file_and_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let places: Vec<GarbagePlace> = load_records(file.path()).unwrap();
        let store = MemoryStore::new();
        assert_eq!(seed_store(&store, &places).await.unwrap(), 2);
        assert_eq!(store.len("GarbagePlaces"), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_records::<GarbagePlace>(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
