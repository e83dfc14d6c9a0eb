use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use vitrine_forms::{FormOrchestrator, FormResult, StorefrontConfig, Validity};

/// Loads `form_name` from `config_path`, feeds it the values in
/// `values_path` and runs a full validation pass
pub fn validate_file(
    config_path: &Path,
    form_name: &str,
    values_path: &Path,
    today: Option<NaiveDate>,
) -> Result<FormResult> {
    let config = StorefrontConfig::load(config_path)?;
    let form_config = config.form(form_name).ok_or_else(|| {
        anyhow!(
            "Form '{}' not found (available: {})",
            form_name,
            config.forms.keys().cloned().collect::<Vec<_>>().join(", ")
        )
    })?;

    let content = fs::read_to_string(values_path)
        .with_context(|| format!("Failed to read values file: {:?}", values_path))?;
    let values: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON object of strings in {:?}", values_path))?;

    debug!(
        "Checking {} value(s) against form '{}' ({} fields)",
        values.len(),
        form_name,
        form_config.fields.len()
    );

    let mut form = FormOrchestrator::new(form_config)?;
    if let Some(today) = today {
        form.set_today(today);
    }

    for (id, value) in &values {
        debug!("Feeding '{}' = {:?}", id, value);
        form.on_input(id, value)
            .with_context(|| format!("Value for unknown field '{}'", id))?;
    }

    Ok(form.validate())
}

pub fn execute(
    config_path: &Path,
    form_name: &str,
    values_path: &Path,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<bool> {
    let result = validate_file(config_path, form_name, values_path, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result.all_valid);
    }

    println!("{} {}", "Form".bold(), form_name.cyan());
    println!();
    for (id, state) in &result.fields {
        match &state.validity {
            Validity::Valid => println!("  {} {}", "✓".green(), id),
            Validity::Invalid(err) => println!("  {} {}: {}", "✗".red(), id, err.to_string().red()),
            Validity::Untouched => println!("  {} {}", "·".dimmed(), id.dimmed()),
        }
    }
    println!();

    let invalid = result.errors().count();
    if result.all_valid {
        println!("{}", "All fields valid".green().bold());
    } else {
        println!("{}", format!("{} invalid field(s)", invalid).red().bold());
    }

    Ok(result.all_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use vitrine_forms::ValidationError;

    fn values_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_registration_values() {
        let values = values_file(
            r#"{"nome": "Maria", "email": "maria@example", "senha": "s3nh@1", "confirmar_senha": "s3nh@1"}"#,
        );
        let result = validate_file(
            Path::new("/nonexistent/vitrine.toml"),
            "registration",
            values.path(),
            None,
        )
        .unwrap();

        assert!(!result.all_valid);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors, vec![("email", &ValidationError::MalformedEmail)]);
    }

    #[test]
    fn test_unknown_form_and_field() {
        let values = values_file(r#"{"apelido": "x"}"#);
        let missing = Path::new("/nonexistent/vitrine.toml");

        assert!(validate_file(missing, "newsletter", values.path(), None).is_err());
        assert!(validate_file(missing, "registration", values.path(), None).is_err());
    }
}
