//! Field kinds known to the masking engine and validators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of an input field. Decides which mask and which dedicated
/// validator apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Brazilian taxpayer ID (CPF), `ddd.ddd.ddd-dd`
    TaxpayerId,
    /// Mobile phone with area code, `(dd) ddddd-dddd`
    Phone,
    /// Postal code (CEP), `ddddd-ddd`
    PostalCode,
    /// Card number, four groups of four digits
    CardNumber,
    /// Card expiry, `dd/dd`
    ExpiryDate,
    Email,
    /// Calendar date (birth date)
    Date,
    GenericText,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::TaxpayerId,
        FieldKind::Phone,
        FieldKind::PostalCode,
        FieldKind::CardNumber,
        FieldKind::ExpiryDate,
        FieldKind::Email,
        FieldKind::Date,
        FieldKind::GenericText,
    ];

    /// Maximum number of digits kept for masked kinds
    pub fn max_digits(&self) -> Option<usize> {
        match self {
            FieldKind::TaxpayerId => Some(11),
            FieldKind::Phone => Some(11),
            FieldKind::PostalCode => Some(8),
            FieldKind::CardNumber => Some(16),
            FieldKind::ExpiryDate => Some(4),
            FieldKind::Email | FieldKind::Date | FieldKind::GenericText => None,
        }
    }

    /// Whether input of this kind is reduced to digits and masked
    pub fn is_masked(&self) -> bool {
        self.max_digits().is_some()
    }

    /// Whether the kind has a dedicated validator besides "required"
    pub fn has_validator(&self) -> bool {
        matches!(
            self,
            FieldKind::TaxpayerId | FieldKind::Phone | FieldKind::Email | FieldKind::Date
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::TaxpayerId => "taxpayer_id",
            FieldKind::Phone => "phone",
            FieldKind::PostalCode => "postal_code",
            FieldKind::CardNumber => "card_number",
            FieldKind::ExpiryDate => "expiry_date",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::GenericText => "generic_text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for FieldKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "taxpayer_id" | "taxpayerid" | "cpf" => Ok(FieldKind::TaxpayerId),
            "phone" | "mobile" => Ok(FieldKind::Phone),
            "postal_code" | "postalcode" | "cep" | "zip" => Ok(FieldKind::PostalCode),
            "card_number" | "cardnumber" | "card" => Ok(FieldKind::CardNumber),
            "expiry_date" | "expirydate" | "expiry" => Ok(FieldKind::ExpiryDate),
            "email" => Ok(FieldKind::Email),
            "date" | "birth_date" => Ok(FieldKind::Date),
            "generic_text" | "text" => Ok(FieldKind::GenericText),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("cpf".parse::<FieldKind>(), Ok(FieldKind::TaxpayerId));
        assert_eq!("CEP".parse::<FieldKind>(), Ok(FieldKind::PostalCode));
        assert_eq!("card-number".parse::<FieldKind>(), Ok(FieldKind::CardNumber));
        assert!("iban".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.to_string().parse::<FieldKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FieldKind::ExpiryDate).unwrap();
        assert_eq!(json, "\"expiry_date\"");
    }

    #[test]
    fn test_max_digits() {
        assert_eq!(FieldKind::TaxpayerId.max_digits(), Some(11));
        assert_eq!(FieldKind::CardNumber.max_digits(), Some(16));
        assert_eq!(FieldKind::Email.max_digits(), None);
        assert!(!FieldKind::Date.is_masked());
    }
}
