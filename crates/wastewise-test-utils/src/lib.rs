//! Testing utilities for WasteWise workspace
//!
//! Shared fixtures, seeded stores and async helpers.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;
use wastewise_live::{LiveCollectionView, ViewPhase};
use wastewise_model::{
    Complaint, ComplaintForm, DocumentId, DriverForm, Entity, GarbagePlace, PlaceForm, Searchable, UserProfile,
    UserType,
};
use wastewise_store::{EntityStoreExt, MemoryIdentity, MemoryStore};

pub fn create_place(id: &str, address: &str, waste_type: &str) -> GarbagePlace {
    GarbagePlace {
        id: DocumentId::new(id),
        location_name: format!("Site {id}"),
        address: address.to_string(),
        waste_type: waste_type.to_string(),
        capacity: "100".to_string(),
        contact_person: "A. Perera".to_string(),
        phone_number: "0771234567".to_string(),
    }
}

/// Main St (Organic) and Park Ave (Recyclable)
pub fn sample_places() -> Vec<GarbagePlace> {
    vec![
        create_place("1", "12 Main St", "Organic"),
        create_place("2", "5 Park Ave", "Recyclable"),
    ]
}

pub fn valid_place_form() -> PlaceForm {
    PlaceForm {
        location_name: "Central Depot".to_string(),
        address: "12 Main St".to_string(),
        waste_type: "Organic".to_string(),
        capacity: "500".to_string(),
        contact_person: "A. Perera".to_string(),
        phone_number: "077 123 4567".to_string(),
    }
}

pub fn valid_complaint_form() -> ComplaintForm {
    ComplaintForm {
        full_name: "Nimal Silva".to_string(),
        complaint_type: "Missed pickup".to_string(),
        missed_pickup_date: "2024-05-01".to_string(),
        garbage_type: "Organic".to_string(),
        garbage_location: "12 Main St".to_string(),
        additional_details: String::new(),
    }
}

pub fn valid_driver_form() -> DriverForm {
    DriverForm {
        driver_name: "Sunil Fernando".to_string(),
        vehicle_number: "wp-ab-1234".to_string(),
        partner_name: "K. Jayasuriya".to_string(),
        vehicle_type: "Compactor".to_string(),
        capacity: "8".to_string(),
        collecting_area: "Colombo 05".to_string(),
        arrival_time: "07:30".to_string(),
        leaving_time: "11:00".to_string(),
    }
}

pub fn create_complaint(id: &str, full_name: &str) -> Complaint {
    let mut complaint = valid_complaint_form()
        .validate()
        .expect("fixture complaint form is valid");
    complaint.id = DocumentId::new(id);
    complaint.full_name = full_name.to_string();
    complaint
}

pub fn create_profile(uid: &str, name: &str, user_type: UserType) -> UserProfile {
    UserProfile {
        uid: DocumentId::new(uid),
        name: name.to_string(),
        mobile: "0771234567".to_string(),
        email: format!("{}@gmail.com", name.to_lowercase().replace(' ', ".")),
        user_type,
    }
}

/// Store holding `records` at their own keys
pub async fn seeded_store<T: Entity>(records: &[T]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for record in records {
        store.put(record).await.expect("seeding memory store");
    }
    store
}

/// Identity with one account whose profile is stored under the same uid
pub async fn seeded_identity(store: &MemoryStore, profile: &UserProfile, password: &str) -> MemoryIdentity {
    let identity = MemoryIdentity::new();
    identity
        .register(profile.uid.clone(), &profile.email, password)
        .expect("registering fixture account");
    store.put(profile).await.expect("storing fixture profile");
    identity
}

/// Let spawned tasks run until they block
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Wait (up to a second of runtime time) until the view reaches `phase`
pub async fn wait_for_phase<T: Entity + Searchable>(view: &LiveCollectionView<T>, phase: ViewPhase) {
    let mut changes = view.changes();
    let reached = tokio::time::timeout(Duration::from_secs(1), async {
        while view.phase() != phase {
            if changes.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(
        reached.is_ok() && view.phase() == phase,
        "view stuck in {} waiting for {phase}",
        view.phase()
    );
}
