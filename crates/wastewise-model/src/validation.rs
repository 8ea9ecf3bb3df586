//! Form validation
//!
//! Validation happens before any network call. Every failing field is
//! collected so the form can show each message next to its input.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PLACE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s\-']+$").expect("valid regex"));
static PERSON_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s\-'.]+$").expect("valid regex"));
static GMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@gmail\.com$").expect("valid regex"));

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as shown on the form (camelCase document name)
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

/// All validation failures of one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create empty error set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a field check, keeping the value on success
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    /// Message recorded for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Whether no field failed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate failures in form order
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    /// Returns `self` if any field failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "invalid input ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Non-blank text, trimmed
///
/// # Errors
/// `"{label} is required"` when blank
pub fn required(value: &str, label: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Location name: letters, spaces, hyphens and apostrophes
///
/// # Errors
/// Message for missing or invalid names
pub fn location_name(value: &str) -> Result<String, String> {
    let name = required(value, "Location name")?;
    if PLACE_NAME.is_match(&name) {
        Ok(name)
    } else {
        Err("Invalid characters in location name".to_string())
    }
}

/// Person name: letters, spaces, hyphens, apostrophes and periods
///
/// # Errors
/// Message for missing or invalid names
pub fn person_name(value: &str, label: &str) -> Result<String, String> {
    let name = required(value, label)?;
    if PERSON_NAME.is_match(&name) {
        Ok(name)
    } else {
        Err("Invalid name format".to_string())
    }
}

/// Positive numeric capacity, kept as its trimmed text
///
/// # Errors
/// Message for missing or non-positive values
pub fn capacity(value: &str) -> Result<String, String> {
    let text = required(value, "Capacity")?;
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(text),
        _ => Err("Must be a positive number".to_string()),
    }
}

/// Sign-in address, which must be a Gmail account
///
/// # Errors
/// Message for missing or non-Gmail addresses
pub fn sign_in_email(value: &str) -> Result<String, String> {
    let address = required(value, "Email")?;
    if GMAIL.is_match(&address) {
        Ok(address)
    } else {
        Err("Valid Gmail required".to_string())
    }
}

/// Calendar date in `YYYY-MM-DD` form
///
/// # Errors
/// Message for missing or unparseable dates
pub fn calendar_date(value: &str, label: &str) -> Result<NaiveDate, String> {
    let text = required(value, label)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| format!("{label} must be YYYY-MM-DD"))
}
