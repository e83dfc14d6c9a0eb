//! Taxpayer ID (CPF) checksum validation

use crate::error::ValidationError;

/// Computes a CPF check digit over at most 10 `digits`, weighting the first
/// one with `first_weight` and each following one with one less (down to 2).
///
/// Returns 0 when `11 - (sum mod 11)` is 10 or 11. Each digit is reduced
/// mod 10 first.
pub(crate) fn taxpayer_check_digit(digits: &[u8], first_weight: u8) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(&d, w)| u32::from(d % 10) * u32::from(w))
        .sum();

    match 11 - (sum % 11) {
        10 | 11 => 0,
        check => check as u8,
    }
}

/// Checks a taxpayer ID, formatted or not.
///
/// The value is stripped to digits first; it must have exactly 11 digits,
/// not all identical, and both trailing check digits must match.
pub fn is_valid_taxpayer_id(value: &str) -> bool {
    let digits: Vec<u8> = value
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != 11 {
        return false;
    }

    // 000.000.000-00, 111.111.111-11, ... pass the checksum but are not issued
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    taxpayer_check_digit(&digits[..9], 10) == digits[9]
        && taxpayer_check_digit(&digits[..10], 11) == digits[10]
}

pub fn validate_taxpayer_id(value: &str) -> Result<(), ValidationError> {
    if is_valid_taxpayer_id(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTaxpayerId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_taxpayer_ids() {
        assert!(is_valid_taxpayer_id("11144477735"));
        assert!(is_valid_taxpayer_id("111.444.777-35"));
        assert!(is_valid_taxpayer_id("529.982.247-25"));
    }

    #[test]
    fn test_invalid_taxpayer_ids() {
        assert!(!is_valid_taxpayer_id("11111111111"));
        assert!(!is_valid_taxpayer_id("000.000.000-00"));
        assert!(!is_valid_taxpayer_id("12345678901"));
        assert!(!is_valid_taxpayer_id("11144477736"));
        assert!(!is_valid_taxpayer_id("1114447773"));
        assert!(!is_valid_taxpayer_id("111444777350"));
        assert!(!is_valid_taxpayer_id(""));
        assert!(!is_valid_taxpayer_id("abc.def.ghi-jk"));
    }

    #[test]
    fn test_check_digits() {
        let digits = [1, 1, 1, 4, 4, 4, 7, 7, 7, 3];
        assert_eq!(taxpayer_check_digit(&digits[..9], 10), 3);
        assert_eq!(taxpayer_check_digit(&digits, 11), 5);
    }

    #[test]
    fn test_check_digit_with_largest_inputs() {
        let nines = [9u8; 10];
        assert!(taxpayer_check_digit(&nines, 11) <= 9);
        assert!(taxpayer_check_digit(&[u8::MAX; 10], 11) <= 9);
    }

    #[test]
    fn test_validate_reports_taxonomy_error() {
        assert_eq!(
            validate_taxpayer_id("12345678901"),
            Err(ValidationError::InvalidTaxpayerId)
        );
        assert!(validate_taxpayer_id("111.444.777-35").is_ok());
    }
}
