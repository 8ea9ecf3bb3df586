//! Garbage place report

use crate::error::CoreError;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use wastewise_model::{format_phone, GarbagePlace, WasteCategory};

/// Summary of every known garbage place
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceReport {
    /// Places in report order
    pub entries: Vec<GarbagePlace>,
    /// Sum of parseable capacities
    pub total_capacity: f64,
    /// Number of places per category
    pub by_category: BTreeMap<WasteCategory, usize>,
}

impl PlaceReport {
    /// Build a report, ordered by location name
    ///
    /// # Errors
    /// `CoreError::EmptyReport` when there are no places
    pub fn build(places: &[GarbagePlace]) -> Result<Self, CoreError> {
        if places.is_empty() {
            return Err(CoreError::EmptyReport);
        }

        let mut entries = places.to_vec();
        entries.sort_by(|a, b| a.location_name.to_lowercase().cmp(&b.location_name.to_lowercase()));

        let total_capacity = entries.iter().filter_map(GarbagePlace::capacity_value).sum();
        let mut by_category = BTreeMap::new();
        for place in &entries {
            *by_category.entry(place.category()).or_insert(0) += 1;
        }

        Ok(Self {
            entries,
            total_capacity,
            by_category,
        })
    }

    /// Number of places
    #[inline]
    #[must_use]
    pub fn total_bins(&self) -> usize {
        self.entries.len()
    }

    /// Plain-text rendering
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Waste Management Report");
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out, "Total bins: {}", self.total_bins());
        let _ = writeln!(out, "Total capacity: {}", self.total_capacity);
        for (category, count) in &self.by_category {
            let _ = writeln!(out, "  {category}: {count}");
        }
        for place in &self.entries {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", place.location_name);
            let _ = writeln!(out, "  Address: {}", place.address);
            let _ = writeln!(out, "  Waste type: {}", place.waste_type);
            let _ = writeln!(out, "  Capacity: {}", place.capacity);
            let _ = writeln!(out, "  Contact: {} ({})", place.contact_person, format_phone(&place.phone_number));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wastewise_test_utils::{create_place, sample_places};

    #[test]
    fn empty_set_is_rejected() {
        let err = PlaceReport::build(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Add garbage bins to generate reports");
    }

    #[test]
    fn totals_and_categories() {
        let mut places = sample_places();
        let mut odd = create_place("3", "9 Lake Rd", "Hazardous waste");
        odd.capacity = "n/a".into();
        places.push(odd);

        let report = PlaceReport::build(&places).unwrap();
        assert_eq!(report.total_bins(), 3);
        assert!((report.total_capacity - 200.0).abs() < f64::EPSILON);
        assert_eq!(report.by_category.get(&WasteCategory::Hazardous), Some(&1));
        assert_eq!(report.by_category.get(&WasteCategory::Organic), Some(&1));
        assert_eq!(report.by_category.get(&WasteCategory::General), None);
    }

    #[test]
    fn text_lists_every_place() {
        let report = PlaceReport::build(&sample_places()).unwrap();
        let text = report.render_text();
        assert!(text.contains("Total bins: 2"));
        assert!(text.contains("  Address: 5 Park Ave"));
        assert!(text.contains("(077 123 4567)"));
    }
}
