use anyhow::Result;
use vitrine_validation::{mask, unmask};

use super::parse_kind;

pub fn execute(kind: &str, value: &str) -> Result<bool> {
    let kind = parse_kind(kind)?;
    let raw = unmask(kind, value);
    println!("{}", mask(kind, &raw));
    Ok(true)
}
