//! Vitrine Validation Core
//!
//! Input masks and pure field validators for the storefront checkout and
//! registration forms. Used by the form orchestrator and by the WASM
//! bindings that run the same checks in the browser.

use chrono::NaiveDate;

pub mod date;
pub mod email;
pub mod error;
pub mod kind;
pub mod mask;
pub mod password;
pub mod phone;
pub mod string;
pub mod taxpayer_id;

// Re-export all validators
pub use date::*;
pub use email::*;
pub use error::*;
pub use kind::*;
pub use mask::*;
pub use password::*;
pub use phone::*;
pub use string::*;
pub use taxpayer_id::*;

/// Runs the dedicated validator of `kind` against `value`.
///
/// Kinds without one (postal code, card fields, free text) always pass;
/// requiredness is checked separately.
pub fn validate_kind(kind: FieldKind, value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    match kind {
        FieldKind::TaxpayerId => validate_taxpayer_id(value),
        FieldKind::Phone => validate_phone(value),
        FieldKind::Email => validate_email(value),
        FieldKind::Date => validate_birth_date(value, today),
        FieldKind::PostalCode
        | FieldKind::CardNumber
        | FieldKind::ExpiryDate
        | FieldKind::GenericText => Ok(()),
    }
}
