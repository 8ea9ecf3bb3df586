//! Garbage collection places

use crate::document::DocumentId;
use crate::entity::{Entity, Searchable};
use crate::phone::validate_phone_number;
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A disposal point managed by administrators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarbagePlace {
    /// Store-assigned key
    #[serde(skip)]
    pub id: DocumentId,
    /// Display name
    pub location_name: String,
    /// Street address
    pub address: String,
    /// Free-text waste type
    pub waste_type: String,
    /// Capacity as entered (numeric string)
    pub capacity: String,
    /// Person responsible for the site
    pub contact_person: String,
    /// Normalized mobile number
    pub phone_number: String,
}

impl GarbagePlace {
    /// Numeric capacity, if the stored text parses
    #[must_use]
    pub fn capacity_value(&self) -> Option<f64> {
        self.capacity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    /// Whether the address mentions `area`, ignoring case
    ///
    /// The customer locator matches on the address alone.
    #[must_use]
    pub fn serves_area(&self, area: &str) -> bool {
        self.address.to_lowercase().contains(&area.trim().to_lowercase())
    }

    /// Category derived from the waste type text
    #[inline]
    #[must_use]
    pub fn category(&self) -> WasteCategory {
        WasteCategory::classify(&self.waste_type)
    }
}

impl Entity for GarbagePlace {
    const COLLECTION: &'static str = "GarbagePlaces";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}

impl Searchable for GarbagePlace {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.address.as_str(),
            self.location_name.as_str(),
            self.waste_type.as_str(),
        ]
    }
}

/// Coarse classification used for icons and report grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WasteCategory {
    /// Recyclable material
    Recyclable,
    /// Compostable material
    Organic,
    /// Hazardous material
    Hazardous,
    /// Anything else
    General,
}

impl WasteCategory {
    /// Classify free-text waste type (case-insensitive)
    #[must_use]
    pub fn classify(waste_type: &str) -> Self {
        let lower = waste_type.to_lowercase();
        if lower.contains("recycl") {
            Self::Recyclable
        } else if lower.contains("organic") {
            Self::Organic
        } else if lower.contains("hazard") {
            Self::Hazardous
        } else {
            Self::General
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Recyclable => "Recyclable",
            Self::Organic => "Organic",
            Self::Hazardous => "Hazardous",
            Self::General => "General",
        };
        f.write_str(label)
    }
}

/// Raw add/edit form input for a place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceForm {
    /// Location name input
    pub location_name: String,
    /// Address input
    pub address: String,
    /// Waste type input
    pub waste_type: String,
    /// Capacity input
    pub capacity: String,
    /// Contact person input
    pub contact_person: String,
    /// Phone number input (any punctuation)
    pub phone_number: String,
}

impl PlaceForm {
    /// Prefill an edit form from a stored place
    #[must_use]
    pub fn from_place(place: &GarbagePlace) -> Self {
        Self {
            location_name: place.location_name.clone(),
            address: place.address.clone(),
            waste_type: place.waste_type.clone(),
            capacity: place.capacity.clone(),
            contact_person: place.contact_person.clone(),
            phone_number: place.phone_number.clone(),
        }
    }

    /// Validate every field into an unsaved place
    ///
    /// # Errors
    /// All failing fields, keyed by document field name
    pub fn validate(&self) -> Result<GarbagePlace, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let location_name = errors.check("locationName", validation::location_name(&self.location_name));
        let address = errors.check("address", validation::required(&self.address, "Address"));
        let waste_type = errors.check("wasteType", validation::required(&self.waste_type, "Waste type"));
        let capacity = errors.check("capacity", validation::capacity(&self.capacity));
        let contact_person = errors.check(
            "contactPerson",
            validation::person_name(&self.contact_person, "Contact person"),
        );
        let phone_number = errors.check(
            "phoneNumber",
            validate_phone_number(&self.phone_number).map_err(|e| e.to_string()),
        );

        match (location_name, address, waste_type, capacity, contact_person, phone_number) {
            (
                Some(location_name),
                Some(address),
                Some(waste_type),
                Some(capacity),
                Some(contact_person),
                Some(phone_number),
            ) => Ok(GarbagePlace {
                id: DocumentId::default(),
                location_name,
                address,
                waste_type,
                capacity,
                contact_person,
                phone_number,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    fn valid_form() -> PlaceForm {
        PlaceForm {
            location_name: "Central Depot".into(),
            address: "12 Main St".into(),
            waste_type: "Organic".into(),
            capacity: "500".into(),
            contact_person: "A. Perera".into(),
            phone_number: "077 123 4567".into(),
        }
    }

    #[test]
    fn valid_form_normalizes_phone() {
        let place = valid_form().validate().unwrap();
        assert_eq!(place.phone_number, "0771234567");
        assert!(place.id.is_unassigned());
    }

    #[test]
    fn area_matches_address_only() {
        let mut place = valid_form().validate().unwrap();
        place.address = "14 Temple Rd, Kandy".into();
        place.location_name = "Colombo Yard".into();

        assert!(place.serves_area("kandy"));
        assert!(place.serves_area(" KANDY "));
        assert!(!place.serves_area("Colombo"));
        assert!(!place.serves_area("Organic"));
    }

    #[test]
    fn invalid_form_reports_every_field() {
        let form = PlaceForm {
            location_name: "Depot #9".into(),
            phone_number: "0791234567".into(),
            ..PlaceForm::default()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("locationName"), Some("Invalid characters in location name"));
        assert_eq!(errors.get("address"), Some("Address is required"));
        assert_eq!(errors.get("phoneNumber"), Some("Invalid mobile prefix"));
    }

    #[test]
    fn edit_form_roundtrips_stored_place() {
        let place = valid_form().validate().unwrap();
        let again = PlaceForm::from_place(&place).validate().unwrap();
        assert_eq!(place, again);
    }

    #[test]
    fn decodes_camel_case_document() {
        let fields = json!({
            "locationName": "Park Bins",
            "address": "5 Park Ave",
            "wasteType": "Recyclable",
            "capacity": "120",
            "contactPerson": "N. Silva",
            "phoneNumber": "0711234567"
        });
        let serde_json::Value::Object(fields) = fields else {
            unreachable!()
        };
        let place = GarbagePlace::from_document(Document::new("2", fields)).unwrap();

        assert_eq!(place.id.as_str(), "2");
        assert_eq!(place.category(), WasteCategory::Recyclable);
        assert_eq!(place.capacity_value(), Some(120.0));
        assert_eq!(place.search_fields(), vec!["5 Park Ave", "Park Bins", "Recyclable"]);
    }

    #[test]
    fn classify_waste_types() {
        assert_eq!(WasteCategory::classify("Recycling - plastics"), WasteCategory::Recyclable);
        assert_eq!(WasteCategory::classify("ORGANIC"), WasteCategory::Organic);
        assert_eq!(WasteCategory::classify("hazardous"), WasteCategory::Hazardous);
        assert_eq!(WasteCategory::classify("Mixed"), WasteCategory::General);
    }

    #[test]
    fn unparseable_capacity_has_no_value() {
        let place = GarbagePlace {
            capacity: "about 10".into(),
            ..GarbagePlace::default()
        };
        assert_eq!(place.capacity_value(), None);
    }
}
