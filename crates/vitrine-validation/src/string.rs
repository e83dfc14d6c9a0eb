//! Text field validators

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// ASCII letters, Latin-1 accented letters and spaces
static PERSON_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\u{00C0}-\u{00FF} ]+$").expect("name pattern compiles"));

/// Fails with `MissingRequired` when the trimmed value is empty
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingRequired)
    } else {
        Ok(())
    }
}

/// Validates minimum length in characters of the trimmed value
pub fn validate_min_length(value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() >= min {
        Ok(())
    } else {
        Err(ValidationError::TooShort(min))
    }
}

/// Validates a person's name: at least 2 characters, letters and spaces only
pub fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    let name = value.trim();
    if name.chars().count() >= 2 && PERSON_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("x").is_ok());
        assert_eq!(validate_required("   "), Err(ValidationError::MissingRequired));
        assert_eq!(validate_required(""), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(validate_min_length("çã", 2).is_ok());
        assert_eq!(validate_min_length(" a ", 2), Err(ValidationError::TooShort(2)));
    }

    #[test]
    fn test_person_name() {
        assert!(validate_person_name("João da Silva").is_ok());
        assert!(validate_person_name("Zoë").is_ok());
        assert_eq!(validate_person_name("J"), Err(ValidationError::InvalidName));
        assert_eq!(validate_person_name("R2D2"), Err(ValidationError::InvalidName));
        assert_eq!(validate_person_name("Ana-Maria"), Err(ValidationError::InvalidName));
    }
}
