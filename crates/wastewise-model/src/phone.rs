//! Mobile phone numbers
//!
//! Numbers are stored as bare digit strings. Input may contain spaces,
//! dashes or other punctuation, which is stripped before the checks run.

/// Mobile operator prefixes accepted for contact numbers
pub const MOBILE_PREFIXES: [&str; 8] = ["070", "071", "072", "074", "075", "076", "077", "078"];

/// Reasons a phone number is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneError {
    /// No digits at all
    #[error("Phone number is required")]
    Missing,

    /// Wrong number of digits
    #[error("Must be 10 digits")]
    WrongLength(usize),

    /// Does not start with the trunk zero
    #[error("Must start with 0")]
    MissingLeadingZero,

    /// Prefix not in [`MOBILE_PREFIXES`]
    #[error("Invalid mobile prefix")]
    InvalidPrefix(String),
}

/// Strip everything except ASCII digits
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a mobile number, returning its normalized digits
///
/// # Errors
/// The first rule the number breaks
pub fn validate_phone_number(raw: &str) -> Result<String, PhoneError> {
    let digits = normalize_phone(raw);
    if digits.is_empty() {
        return Err(PhoneError::Missing);
    }
    if digits.len() != 10 {
        return Err(PhoneError::WrongLength(digits.len()));
    }
    if !digits.starts_with('0') {
        return Err(PhoneError::MissingLeadingZero);
    }

    let prefix = &digits[..3];
    if !MOBILE_PREFIXES.contains(&prefix) {
        return Err(PhoneError::InvalidPrefix(prefix.to_string()));
    }

    Ok(digits)
}

/// Display form `077 123 4567`; other shapes are returned unchanged
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits = normalize_phone(raw);
    if digits.len() == 10 {
        format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        raw.to_string()
    }
}
