//! Birth date and age checks

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{AgeError, ValidationError};

/// Minimum age accepted at checkout
pub const MIN_AGE: i32 = 18;

/// Ages above this are treated as a typo in the date
pub const MAX_AGE: i32 = 120;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parses `YYYY-MM-DD` (HTML date inputs) or `DD/MM/YYYY`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Age in whole years on `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

pub fn validate_age(birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let age = age_on(birth, today);
    if age < MIN_AGE {
        Err(ValidationError::InvalidAge(AgeError::TooYoung))
    } else if age > MAX_AGE {
        Err(ValidationError::InvalidAge(AgeError::TooOld))
    } else {
        Ok(())
    }
}

/// Validates a birth date field value against `today`
pub fn validate_birth_date(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidAge(AgeError::Missing));
    }

    let birth = parse_date(value).ok_or(ValidationError::InvalidAge(AgeError::Malformed))?;
    validate_age(birth, today)
}

/// Latest selectable birth date: exactly 18 years before `today`.
///
/// 29 February maps to 28 February when the target year is not a leap year.
pub fn max_birth_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(12 * MIN_AGE as u32))
        .unwrap_or(NaiveDate::MIN)
}
