//! Validation failures
//!
//! Every failure is user-correctable and shown next to the offending field.

use serde::{Deserialize, Serialize};

/// Why a birth date was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeError {
    TooYoung,
    TooOld,
    Missing,
    /// The value could not be parsed as a date
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("required field")]
    MissingRequired,

    #[error("invalid email address")]
    MalformedEmail,

    #[error("invalid taxpayer ID")]
    InvalidTaxpayerId,

    #[error("invalid mobile number (area code + 9xxxx-xxxx)")]
    InvalidPhone,

    #[error("{}", age_message(.0))]
    InvalidAge(AgeError),

    #[error("name must contain only letters and have at least 2 characters")]
    InvalidName,

    #[error("{0}")]
    WeakPassword(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("must be at least {0} characters")]
    TooShort(usize),

    #[error("postal code not found")]
    PostalCodeNotFound,
}

fn age_message(err: &AgeError) -> &'static str {
    match err {
        AgeError::TooYoung => "must be at least 18",
        AgeError::TooOld | AgeError::Malformed => "invalid date",
        AgeError::Missing => "birth date is required",
    }
}

impl ValidationError {
    /// Stable tag for the rendering layer
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequired => "missing_required",
            ValidationError::MalformedEmail => "malformed_email",
            ValidationError::InvalidTaxpayerId => "invalid_taxpayer_id",
            ValidationError::InvalidPhone => "invalid_phone",
            ValidationError::InvalidAge(AgeError::TooYoung) => "too_young",
            ValidationError::InvalidAge(AgeError::TooOld) => "too_old",
            ValidationError::InvalidAge(AgeError::Missing) => "missing_date",
            ValidationError::InvalidAge(AgeError::Malformed) => "malformed_date",
            ValidationError::InvalidName => "invalid_name",
            ValidationError::WeakPassword(_) => "weak_password",
            ValidationError::PasswordMismatch => "password_mismatch",
            ValidationError::TooShort(_) => "too_short",
            ValidationError::PostalCodeNotFound => "postal_code_not_found",
        }
    }
}
