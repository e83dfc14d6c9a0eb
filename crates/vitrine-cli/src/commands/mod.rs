pub mod check;
pub mod form;
#[cfg(feature = "viacep")]
pub mod lookup;
pub mod mask;

use anyhow::{Context, Result};
use vitrine_validation::FieldKind;

pub(crate) fn parse_kind(kind: &str) -> Result<FieldKind> {
    kind.parse::<FieldKind>()
        .with_context(|| format!("Expected one of: {}", kind_names()))
}

fn kind_names() -> String {
    FieldKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
