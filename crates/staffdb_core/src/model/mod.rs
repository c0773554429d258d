//! Record types and their field-level validation.
//!
//! # Responsibility
//! - Define the `Person` and `Job` records and their schema descriptors.
//! - Reject values the storage layer would refuse, before any SQL runs.
//!
//! # Invariants
//! - Field limits come from `schema` descriptors, never from literals here.
//! - Primary keys are never empty.

pub mod job;
pub mod person;
pub mod schema;

use schema::{FieldKind, FieldSpec};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for record values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField {
        field: &'static str,
    },
    FieldTooLong {
        field: &'static str,
        max_length: usize,
        actual: usize,
    },
    MalformedDate {
        field: &'static str,
        value: String,
    },
    SalaryNotFinite,
    SalaryOutOfRange {
        value: String,
        max_digits: u32,
        decimal_places: u32,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong {
                field,
                max_length,
                actual,
            } => write!(
                f,
                "{field} is {actual} characters long; max_length is {max_length}"
            ),
            Self::MalformedDate { field, value } => {
                write!(f, "{field} `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::SalaryNotFinite => write!(f, "salary must be a finite number"),
            Self::SalaryOutOfRange {
                value,
                max_digits,
                decimal_places,
            } => write!(
                f,
                "salary {value} does not fit DECIMAL({max_digits}, {decimal_places})"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks a character field against its descriptor.
pub(crate) fn validate_char(field: &FieldSpec, value: &str) -> Result<(), ValidationError> {
    if !field.nullable && value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: field.name });
    }

    if let FieldKind::Char { max_length } = field.kind {
        let actual = value.chars().count();
        if actual > max_length {
            return Err(ValidationError::FieldTooLong {
                field: field.name,
                max_length,
                actual,
            });
        }
    }

    Ok(())
}
