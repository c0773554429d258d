//! Job record, fixed-point salary and raw job input.
//!
//! # Responsibility
//! - Hold a validated job with typed dates and salary.
//! - Parse raw seed input (`JobDraft`) into a `Job`.
//!
//! # Invariants
//! - Dates are accepted only in strict `YYYY-MM-DD` form.
//! - `Salary` never holds more digits than `DECIMAL(7, 2)` allows.
//! - `person_employed` is required; its existence is checked by storage only.

use super::schema::{
    decimal_minor_unit_bound, FieldKind, END_DATE, JOB_NAME, PERSON_EMPLOYED, SALARY, START_DATE,
};
use super::{validate_char, ValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed-point salary stored as minor units (hundredths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salary {
    minor_units: i64,
}

impl Salary {
    const DECIMAL_PLACES: u32 = 2;
    const SCALE: i64 = 10_i64.pow(Self::DECIMAL_PLACES);

    /// Converts a float amount, rounding half away from zero to 2 places.
    ///
    /// Rounding applies to the shortest decimal form of `amount` (`2.675`,
    /// `1.005`), not to its binary expansion.
    pub fn from_f64(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::SalaryNotFinite);
        }
        let literal = format!("{amount}");
        match round_decimal_literal(&literal, Self::DECIMAL_PLACES) {
            Some(minor_units) => Self::from_minor_units(minor_units),
            None => Err(out_of_range(literal)),
        }
    }

    /// Wraps an already-scaled amount, checking the declared digit budget.
    pub fn from_minor_units(minor_units: i64) -> Result<Self, ValidationError> {
        if minor_units.unsigned_abs() > max_minor_units().unsigned_abs() {
            return Err(out_of_range(format_minor_units(minor_units)));
        }
        Ok(Self { minor_units })
    }

    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }
}

impl Display for Salary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_minor_units(self.minor_units))
    }
}

fn max_minor_units() -> i64 {
    match SALARY.kind {
        FieldKind::Decimal { max_digits, .. } => decimal_minor_unit_bound(max_digits),
        _ => i64::MAX,
    }
}

fn out_of_range(value: String) -> ValidationError {
    let (max_digits, decimal_places) = match SALARY.kind {
        FieldKind::Decimal {
            max_digits,
            decimal_places,
        } => (max_digits, decimal_places),
        _ => (0, 0),
    };
    ValidationError::SalaryOutOfRange {
        value,
        max_digits,
        decimal_places,
    }
}

/// Scales a plain decimal literal such as `-12.345` to `places` fractional
/// digits, rounding half away from zero. `None` on overflow or bad digits.
fn round_decimal_literal(literal: &str, places: u32) -> Option<i64> {
    let (negative, digits) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let fraction = fraction.as_bytes();
    if !fraction.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut scaled: i64 = whole.parse().ok()?;
    for index in 0..places as usize {
        let digit = fraction.get(index).map_or(0, |byte| i64::from(byte - b'0'));
        scaled = scaled.checked_mul(10)?.checked_add(digit)?;
    }
    if fraction
        .get(places as usize)
        .is_some_and(|byte| *byte >= b'5')
    {
        scaled = scaled.checked_add(1)?;
    }

    Some(if negative { -scaled } else { scaled })
}

fn format_minor_units(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let magnitude = minor_units.unsigned_abs();
    let scale = Salary::SCALE.unsigned_abs();
    format!(
        "{sign}{}.{:0width$}",
        magnitude / scale,
        magnitude % scale,
        width = Salary::DECIMAL_PLACES as usize
    )
}

/// Parses a strict `YYYY-MM-DD` date for the named field.
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || ValidationError::MalformedDate {
        field,
        value: value.to_string(),
    };
    if !ISO_DATE_RE.is_match(value) {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| malformed())
}

/// Renders a date in the storage form.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A position held by a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub salary: Salary,
    pub person_employed: String,
}

impl Job {
    /// Checks text fields against the `job` schema descriptor.
    ///
    /// Dates and salary are already valid by construction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_char(&JOB_NAME, &self.job_name)?;
        validate_char(&PERSON_EMPLOYED, &self.person_employed)?;
        Ok(())
    }
}

/// Unparsed job input, as written in seed data.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub job_name: String,
    pub start_date: String,
    pub end_date: String,
    pub salary: f64,
    pub person_employed: String,
}

impl JobDraft {
    pub fn new(
        job_name: &str,
        start_date: &str,
        end_date: &str,
        salary: f64,
        person_employed: &str,
    ) -> Self {
        Self {
            job_name: job_name.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            salary,
            person_employed: person_employed.to_string(),
        }
    }

    /// Parses and validates this draft into a storable `Job`.
    pub fn parse(&self) -> Result<Job, ValidationError> {
        let job = Job {
            job_name: self.job_name.clone(),
            start_date: parse_iso_date(START_DATE.name, &self.start_date)?,
            end_date: parse_iso_date(END_DATE.name, &self.end_date)?,
            salary: Salary::from_f64(self.salary)?,
            person_employed: self.person_employed.clone(),
        };
        job.validate()?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_minor_units, parse_iso_date, round_decimal_literal};

    #[test]
    fn format_minor_units_pads_fraction() {
        assert_eq!(format_minor_units(3500), "35.00");
        assert_eq!(format_minor_units(5), "0.05");
        assert_eq!(format_minor_units(-1234), "-12.34");
    }

    #[test]
    fn round_decimal_literal_rounds_half_away_from_zero() {
        assert_eq!(round_decimal_literal("34.999", 2), Some(3500));
        assert_eq!(round_decimal_literal("0.145", 2), Some(15));
        assert_eq!(round_decimal_literal("0.1449", 2), Some(14));
        assert_eq!(round_decimal_literal("-2.675", 2), Some(-268));
        assert_eq!(round_decimal_literal("12", 2), Some(1200));
        assert_eq!(round_decimal_literal("-0", 2), Some(0));
        assert_eq!(round_decimal_literal("100000000000000000000", 2), None);
    }

    #[test]
    fn parse_iso_date_requires_two_digit_parts() {
        assert!(parse_iso_date("start_date", "2019-7-31").is_err());
        assert!(parse_iso_date("start_date", "2019-07-31").is_ok());
    }
}
