//! Client-side field checks run before a request is submitted.
//!
//! A failed check blocks submission: callers validate first and only then
//! touch the network.

use chrono::NaiveDate;
use thiserror::Error;

/// Lowest mark a teacher can assign.
pub const MARK_MIN: i64 = 1;
/// Highest mark a teacher can assign.
pub const MARK_MAX: i64 = 12;
/// Lesson names are unique and at most this many characters server-side.
pub const LESSON_NAME_MAX_CHARS: usize = 100;

/// Validation errors, one per failed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("{field} must be between {min} and {max}.")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{0} must be an integer.")]
    NotInteger(&'static str),

    #[error("{0} contains invalid characters.")]
    InvalidCharacters(&'static str),

    #[error("{0} must be a valid date (YYYY-MM-DD).")]
    InvalidDate(&'static str),

    #[error("{field} must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },
}

/// Check a mark value against the `[MARK_MIN, MARK_MAX]` range.
pub fn mark(value: i64) -> Result<i64, ValidationError> {
    if !(MARK_MIN..=MARK_MAX).contains(&value) {
        return Err(out_of_range());
    }
    Ok(value)
}

/// Parse a mark typed by a user. Empty input, fractions and anything outside
/// the range are rejected.
pub fn parse_mark(input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("mark"));
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return mark(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value < MARK_MIN as f64 || value > MARK_MAX as f64 => {
            Err(out_of_range())
        }
        _ => Err(ValidationError::NotInteger("mark")),
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "mark",
        min: MARK_MIN,
        max: MARK_MAX,
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(field))
}

/// Non-blank text.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Primary keys are positive; zero or negative means "not selected".
pub fn positive_id(field: &'static str, id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Usernames: one or more of ASCII letters, digits and `_ . @ + -`.
pub fn username(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));
    if !valid {
        return Err(ValidationError::InvalidCharacters(field));
    }
    Ok(())
}
