// File: src/field.rs
// Purpose: Per-field state and the view handed to the rendering layer

use serde::Serialize;
use vitrine_validation::{mask, unmask, FieldKind, ValidationError};

/// Validity status of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Validity {
    #[default]
    Untouched,
    Valid,
    Invalid(ValidationError),
}

impl Validity {
    pub fn from_result(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Validity::Valid,
            Err(err) => Validity::Invalid(err),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Validity::Invalid(_))
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Validity::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Current state of one input field. Lives as long as the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub kind: FieldKind,
    /// Underlying value; digits only for masked kinds
    pub raw: String,
    pub validity: Validity,
    /// A postal lookup issued for this field has not been applied yet
    pub pending: bool,
}

impl FieldState {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            raw: String::new(),
            validity: Validity::Untouched,
            pending: false,
        }
    }

    /// Stores new input, reducing it to digits for masked kinds
    pub fn set_input(&mut self, input: &str) {
        self.raw = unmask(self.kind, input);
    }

    /// Text shown in the input, always re-derived from `raw`
    pub fn display(&self) -> String {
        mask(self.kind, &self.raw)
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Validity marker shown next to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum Marker {
    None,
    Valid,
    Invalid(String),
}

impl Marker {
    /// Marker for `validity`, with `message` replacing the validator's reason
    pub fn for_validity(validity: &Validity, message: Option<&str>) -> Self {
        match validity {
            Validity::Untouched => Marker::None,
            Validity::Valid => Marker::Valid,
            Validity::Invalid(err) => {
                Marker::Invalid(message.map(str::to_string).unwrap_or_else(|| err.to_string()))
            }
        }
    }
}

/// Observable outputs of a field: display text, marker, and whether an
/// address lookup is in flight for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub id: String,
    pub text: String,
    pub marker: Marker,
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_input_keeps_digits() {
        let mut state = FieldState::new(FieldKind::TaxpayerId);
        state.set_input("111.444.777-35");
        assert_eq!(state.raw, "11144477735");
        assert_eq!(state.display(), "111.444.777-35");
    }

    #[test]
    fn test_text_input_is_kept_verbatim() {
        let mut state = FieldState::new(FieldKind::GenericText);
        state.set_input("Rua das Flores, 12");
        assert_eq!(state.display(), "Rua das Flores, 12");
        assert!(!state.is_blank());
    }

    #[test]
    fn test_marker_message_override() {
        let invalid = Validity::Invalid(ValidationError::MissingRequired);
        assert_eq!(
            Marker::for_validity(&invalid, None),
            Marker::Invalid("required field".to_string())
        );
        assert_eq!(
            Marker::for_validity(&invalid, Some("Campo obrigatório.")),
            Marker::Invalid("Campo obrigatório.".to_string())
        );
        assert_eq!(Marker::for_validity(&Validity::Valid, Some("x")), Marker::Valid);
    }
}
