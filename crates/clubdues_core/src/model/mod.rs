//! Domain model for the club ledger.
//!
//! # Responsibility
//! - Define the canonical records for groups, members and payments.
//! - Own field-level validation rules (non-empty names, canonical periods).
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - A payment row always means "paid"; unpaid is derived, never stored.

pub mod group;
pub mod member;
pub mod payment;
pub mod period;

/// Field-level validation failure for caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required display name is blank after trimming.
    #[error("{entity} name must not be blank")]
    EmptyName { entity: &'static str },
    /// Period text is not a `YYYY-MM` value.
    #[error("invalid period `{0}`; expected YYYY-MM")]
    InvalidPeriod(String),
    /// Year is not a four-digit calendar year.
    #[error("invalid year `{0}`; expected four digits")]
    InvalidYear(i32),
}

/// Trims a required name, rejecting blank input.
pub(crate) fn normalize_name(
    value: &str,
    entity: &'static str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { entity });
    }
    Ok(trimmed.to_string())
}

/// Trims optional free text, folding blank input into `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
