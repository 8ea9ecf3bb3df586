//! Missed-pickup complaints

use crate::document::DocumentId;
use crate::entity::{Entity, Searchable};
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handling status of a complaint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    /// Awaiting action
    #[default]
    Pending,
    /// Closed by an administrator
    Resolved,
}

impl ComplaintStatus {
    /// Status label as stored
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citizen report about a missed collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Store-assigned key
    #[serde(skip)]
    pub id: DocumentId,
    /// Reporter's name
    pub full_name: String,
    /// Kind of complaint
    pub complaint_type: String,
    /// Date of the missed pickup (`YYYY-MM-DD`)
    pub missed_pickup_date: String,
    /// Kind of garbage left behind
    pub garbage_type: String,
    /// Free-text location; not checked against stored places
    pub garbage_location: String,
    /// Optional notes
    #[serde(default)]
    pub additional_details: String,
    /// Handling status
    #[serde(default)]
    pub status: ComplaintStatus,
}

impl Entity for Complaint {
    const COLLECTION: &'static str = "Complaints";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}

impl Searchable for Complaint {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.full_name.as_str(),
            self.complaint_type.as_str(),
            self.status.as_str(),
        ]
    }
}

/// Raw complaint form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintForm {
    /// Reporter name input
    pub full_name: String,
    /// Complaint type input
    pub complaint_type: String,
    /// Missed pickup date input
    pub missed_pickup_date: String,
    /// Garbage type input
    pub garbage_type: String,
    /// Location input
    pub garbage_location: String,
    /// Notes input
    pub additional_details: String,
}

impl ComplaintForm {
    /// Validate into a new `Pending` complaint
    ///
    /// # Errors
    /// All failing fields
    pub fn validate(&self) -> Result<Complaint, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = errors.check("fullName", validation::person_name(&self.full_name, "Full name"));
        let complaint_type = errors.check(
            "complaintType",
            validation::required(&self.complaint_type, "Complaint type"),
        );
        let missed_pickup_date = errors.check(
            "missedPickupDate",
            validation::calendar_date(&self.missed_pickup_date, "Missed pickup date"),
        );
        let garbage_type = errors.check(
            "garbageType",
            validation::required(&self.garbage_type, "Garbage type"),
        );
        let garbage_location = errors.check(
            "garbageLocation",
            validation::required(&self.garbage_location, "Garbage location"),
        );

        match (full_name, complaint_type, missed_pickup_date, garbage_type, garbage_location) {
            (
                Some(full_name),
                Some(complaint_type),
                Some(date),
                Some(garbage_type),
                Some(garbage_location),
            ) => Ok(Complaint {
                id: DocumentId::default(),
                full_name,
                complaint_type,
                missed_pickup_date: date.format("%Y-%m-%d").to_string(),
                garbage_type,
                garbage_location,
                additional_details: self.additional_details.trim().to_string(),
                status: ComplaintStatus::Pending,
            }),
            _ => Err(errors),
        }
    }
}
