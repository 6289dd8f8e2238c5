//! # Core Validation Errors
//!
//! Field-level validation failures shared across the stack. The API layer
//! maps these to 400 responses; see `creg-api`'s error module.

use thiserror::Error;

/// A field-level validation failure on entity input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An email address failed the minimal shape check.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A course's date range has `start_date` after `end_date`.
    #[error("start_date must not be after end_date")]
    InvalidDateRange,

    /// A course fee was negative.
    #[error("course_fee must not be negative")]
    NegativeFee,

    /// A field exceeded its maximum length.
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Minimal email shape check: non-empty, exactly one `@` with content on
/// both sides, and a dot in the domain part. Full RFC 5321 parsing is out
/// of scope; the store's uniqueness check is the real gate.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ash@pallet.com").is_ok());
        assert!(validate_email("oak+lab@pallet.example.org").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            validate_email(""),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            validate_email("   "),
            Err(ValidationError::MissingField("email"))
        );
    }

    #[test]
    fn rejects_missing_at_or_domain() {
        assert!(validate_email("ash.pallet.com").is_err());
        assert!(validate_email("ash@").is_err());
        assert!(validate_email("@pallet.com").is_err());
        assert!(validate_email("ash@pallet").is_err());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ValidationError::MissingField("course_code");
        assert_eq!(err.to_string(), "course_code is required");
        let err = ValidationError::TooLong {
            field: "title",
            max: 200,
        };
        assert_eq!(err.to_string(), "title must not exceed 200 characters");
    }
}
