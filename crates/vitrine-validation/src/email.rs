//! Email validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Something before a single `@`, a dot somewhere after it, no whitespace
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Validates the permissive email shape used by the storefront forms
///
/// Leading and trailing whitespace is ignored; whitespace inside the
/// address is not.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email.trim())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::MalformedEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("user+tag@example.com.br"));
        assert!(is_valid_email("  user@example.com  "));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email(""));
    }
}
