//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Rejects NaN and infinite coordinates, which JSON numbers cannot carry but
/// in-process callers can.
pub fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new("not_finite"));
    }
    Ok(())
}
