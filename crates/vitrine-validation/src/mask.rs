//! Input masking
//!
//! The display text of a masked field is always re-derived from its digit
//! sequence, so masking can run on every keystroke without keeping state.

use crate::kind::FieldKind;

/// Separators of a mask as (digit offset, text) pairs. The text is emitted
/// right before the digit at that offset, and only once that digit exists.
fn separators(kind: FieldKind) -> &'static [(usize, &'static str)] {
    match kind {
        FieldKind::TaxpayerId => &[(3, "."), (6, "."), (9, "-")],
        FieldKind::Phone => &[(0, "("), (2, ") "), (7, "-")],
        FieldKind::PostalCode => &[(5, "-")],
        FieldKind::CardNumber => &[(4, " "), (8, " "), (12, " ")],
        FieldKind::ExpiryDate => &[(2, "/")],
        FieldKind::Email | FieldKind::Date | FieldKind::GenericText => &[],
    }
}

/// Strips every character that is not an ASCII digit
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats raw input for display.
///
/// Masked kinds are reduced to digits, truncated to the kind's maximum and
/// get their separators inserted. Other kinds are returned unchanged.
///
/// ```
/// use vitrine_validation::{mask, FieldKind};
/// assert_eq!(mask(FieldKind::TaxpayerId, "11144477735"), "111.444.777-35");
/// assert_eq!(mask(FieldKind::Phone, "1199"), "(11) 99");
/// ```
pub fn mask(kind: FieldKind, raw: &str) -> String {
    let Some(max) = kind.max_digits() else {
        return raw.to_string();
    };

    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).take(max).collect();
    let seps = separators(kind);

    let mut out = String::with_capacity(digits.len() + 4);
    for (i, digit) in digits.iter().enumerate() {
        if let Some((_, sep)) = seps.iter().find(|(offset, _)| *offset == i) {
            out.push_str(sep);
        }
        out.push(*digit);
    }
    out
}

/// Underlying value of a displayed field: digits (within the kind's maximum)
/// for masked kinds, the text unchanged otherwise
pub fn unmask(kind: FieldKind, display: &str) -> String {
    match kind.max_digits() {
        Some(max) => display.chars().filter(|c| c.is_ascii_digit()).take(max).collect(),
        None => display.to_string(),
    }
}
