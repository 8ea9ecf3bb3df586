//! WasteWise Model
//!
//! The records kept in the hosted document store and the rules applied to
//! them before they are written:
//! - Typed entities (`GarbagePlace`, `Complaint`, `DriverDetail`, `UserProfile`)
//! - Schema-less `Document` representation and the `Entity` codec trait
//! - `Searchable` fields consumed by client-side filtering
//! - Form validation with per-field error reporting
//!
//! # Example
//!
//! ```rust,ignore
//! use wastewise_model::{PlaceForm, Entity};
//!
//! let form = PlaceForm {
//!     location_name: "Central Depot".into(),
//!     address: "12 Main St".into(),
//!     waste_type: "Organic".into(),
//!     capacity: "500".into(),
//!     contact_person: "A. Perera".into(),
//!     phone_number: "077 123 4567".into(),
//! };
//!
//! let place = form.validate()?;
//! let fields = place.to_fields()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod complaint;
pub mod document;
pub mod driver;
pub mod entity;
pub mod error;
pub mod phone;
pub mod place;
pub mod user;
pub mod validation;

// Re-exports for convenience
pub use complaint::{Complaint, ComplaintForm, ComplaintStatus};
pub use document::{Document, DocumentId, Fields};
pub use driver::{DriverDetail, DriverForm};
pub use entity::{Entity, Searchable};
pub use error::ModelError;
pub use phone::{format_phone, normalize_phone, validate_phone_number, PhoneError, MOBILE_PREFIXES};
pub use place::{GarbagePlace, PlaceForm, WasteCategory};
pub use user::{UserProfile, UserType};
pub use validation::{FieldError, ValidationErrors};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
