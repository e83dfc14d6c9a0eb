//! Mobile phone validation

use crate::error::ValidationError;
use crate::mask::digits_only;

/// Lowest valid two-digit area code
const MIN_AREA_CODE: u32 = 11;

/// Checks a mobile number: 11 digits, area code >= 11, and a leading 9
/// on the subscriber number
pub fn is_valid_phone(value: &str) -> bool {
    let digits = digits_only(value);
    if digits.len() != 11 {
        return false;
    }

    let area_code_ok = digits[..2]
        .parse::<u32>()
        .map(|area| area >= MIN_AREA_CODE)
        .unwrap_or(false);

    area_code_ok && digits.as_bytes()[2] == b'9'
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if is_valid_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}
