//! Password policy checks for the registration form

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Characters accepted as "special" by the registration policy
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_true")]
    pub require_digit: bool,

    #[serde(default = "default_true")]
    pub require_special: bool,
}

fn default_min_length() -> usize {
    6
}

fn default_true() -> bool {
    true
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_digit: true,
            require_special: true,
        }
    }
}

impl PasswordPolicy {
    /// Human-readable summary used as the failure reason
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("at least {} characters", self.min_length)];
        if self.require_digit {
            parts.push("a number".to_string());
        }
        if self.require_special {
            parts.push("a special character (e.g. @, $)".to_string());
        }

        let summary = match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            _ => parts.join(""),
        };
        format!("password must have {}", summary)
    }
}

/// Validates a password against a policy
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= policy.min_length;
    let has_digit = !policy.require_digit || password.chars().any(|c| c.is_ascii_digit());
    let has_special =
        !policy.require_special || password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    if long_enough && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword(policy.describe()))
    }
}

/// The confirmation must repeat the password exactly
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}
