use anyhow::Result;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use vitrine_validation::{max_birth_date as latest_birth_date, validate_kind};

use super::parse_kind;

pub fn execute(kind: &str, value: &str, today: Option<NaiveDate>) -> Result<bool> {
    let kind = parse_kind(kind)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    match validate_kind(kind, value, today) {
        Ok(()) => {
            println!("{} {}", "✓".green().bold(), value);
            Ok(true)
        }
        Err(err) => {
            println!("{} {}: {}", "✗".red().bold(), value, err.to_string().red());
            Ok(false)
        }
    }
}

pub fn max_birth_date(today: Option<NaiveDate>) -> Result<bool> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    println!("{}", latest_birth_date(today).format("%Y-%m-%d"));
    Ok(true)
}
