//! Driver collection schedules

use crate::document::DocumentId;
use crate::entity::{Entity, Searchable};
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};

/// A driver's assignment to a collecting area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetail {
    /// Store-assigned key
    #[serde(skip)]
    pub id: DocumentId,
    /// Driver's name
    pub driver_name: String,
    /// Registration plate
    pub vehicle_number: String,
    /// Crew partner's name
    pub partner_name: String,
    /// Vehicle type
    pub vehicle_type: String,
    /// Load capacity (numeric string)
    pub capacity: String,
    /// Area served
    pub collecting_area: String,
    /// Arrival as entered (free text)
    pub arrival_time: String,
    /// Leaving as entered (free text)
    pub leaving_time: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub cdate: String,
}

impl Entity for DriverDetail {
    const COLLECTION: &'static str = "DriverDetails";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }
}

impl Searchable for DriverDetail {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.driver_name.as_str(),
            self.vehicle_number.as_str(),
            self.collecting_area.as_str(),
        ]
    }
}

/// Raw driver schedule form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverForm {
    /// Driver name input
    pub driver_name: String,
    /// Vehicle number input
    pub vehicle_number: String,
    /// Partner name input
    pub partner_name: String,
    /// Vehicle type input
    pub vehicle_type: String,
    /// Capacity input
    pub capacity: String,
    /// Collecting area input
    pub collecting_area: String,
    /// Arrival time input
    pub arrival_time: String,
    /// Leaving time input
    pub leaving_time: String,
}

impl DriverForm {
    /// Prefill an edit form from a stored schedule
    #[must_use]
    pub fn from_detail(detail: &DriverDetail) -> Self {
        Self {
            driver_name: detail.driver_name.clone(),
            vehicle_number: detail.vehicle_number.clone(),
            partner_name: detail.partner_name.clone(),
            vehicle_type: detail.vehicle_type.clone(),
            capacity: detail.capacity.clone(),
            collecting_area: detail.collecting_area.clone(),
            arrival_time: detail.arrival_time.clone(),
            leaving_time: detail.leaving_time.clone(),
        }
    }

    /// Validate into a schedule without key or creation date
    ///
    /// # Errors
    /// All failing fields
    pub fn validate(&self) -> Result<DriverDetail, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let driver_name = errors.check(
            "driverName",
            validation::person_name(&self.driver_name, "Driver name"),
        );
        let vehicle_number = errors.check(
            "vehicleNumber",
            validation::required(&self.vehicle_number, "Vehicle number"),
        );
        let partner_name = errors.check(
            "partnerName",
            validation::person_name(&self.partner_name, "Partner name"),
        );
        let vehicle_type = errors.check(
            "vehicleType",
            validation::required(&self.vehicle_type, "Vehicle type"),
        );
        let capacity = errors.check("capacity", validation::capacity(&self.capacity));
        let collecting_area = errors.check(
            "collectingArea",
            validation::required(&self.collecting_area, "Collecting area"),
        );
        let arrival = errors.check(
            "arrivalTime",
            validation::required(&self.arrival_time, "Arrival date"),
        );
        let leaving = errors.check(
            "leavingTime",
            validation::required(&self.leaving_time, "Leaving date"),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            driver_name,
            vehicle_number,
            partner_name,
            vehicle_type,
            capacity,
            collecting_area,
            arrival,
            leaving,
        ) {
            (
                Some(driver_name),
                Some(vehicle_number),
                Some(partner_name),
                Some(vehicle_type),
                Some(capacity),
                Some(collecting_area),
                Some(arrival),
                Some(leaving),
            ) => Ok(DriverDetail {
                id: DocumentId::default(),
                driver_name,
                vehicle_number,
                partner_name,
                vehicle_type,
                capacity,
                collecting_area,
                arrival_time: arrival,
                leaving_time: leaving,
                cdate: String::new(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> DriverForm {
        DriverForm {
            driver_name: "Sunil Perera".into(),
            vehicle_number: "wp-ab 1234".into(),
            partner_name: "Ravi".into(),
            vehicle_type: "Compactor".into(),
            capacity: "8000".into(),
            collecting_area: "Kandy North".into(),
            arrival_time: "07:00".into(),
            leaving_time: "09:30".into(),
        }
    }

    #[test]
    fn valid_schedule() {
        let detail = form().validate().unwrap();
        assert_eq!(detail.vehicle_number, "wp-ab 1234");
        assert!(detail.cdate.is_empty());
        assert_eq!(
            detail.search_fields(),
            vec!["Sunil Perera", "wp-ab 1234", "Kandy North"]
        );
    }

    #[test]
    fn overnight_shift_is_accepted() {
        let detail = DriverForm {
            arrival_time: "22:00".into(),
            leaving_time: "02:00".into(),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(detail.arrival_time, "22:00");
        assert_eq!(detail.leaving_time, "02:00");
    }

    #[test]
    fn stored_dates_can_be_edited() {
        let stored = DriverDetail {
            id: "d1".into(),
            arrival_time: "2024-05-01".into(),
            leaving_time: "2024-05-02".into(),
            cdate: "2024-04-30T08:00:00.000Z".into(),
            ..form().validate().unwrap()
        };
        let detail = DriverForm::from_detail(&stored).validate().unwrap();
        assert_eq!(detail.arrival_time, "2024-05-01");
        assert_eq!(detail.leaving_time, "2024-05-02");
    }

    #[test]
    fn arrival_and_leaving_are_required() {
        let errors = DriverForm {
            arrival_time: " ".into(),
            leaving_time: String::new(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("arrivalTime"), Some("Arrival date is required"));
        assert_eq!(errors.get("leavingTime"), Some("Leaving date is required"));
    }

    #[test]
    fn edit_form_keeps_values() {
        let detail = form().validate().unwrap();
        assert_eq!(DriverForm::from_detail(&detail).validate().unwrap(), detail);
    }
}
