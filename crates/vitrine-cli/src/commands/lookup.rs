use anyhow::{Context, Result};
use colored::Colorize;
use vitrine_forms::{PostalLookup, ViaCepClient};

pub fn execute(cep: &str) -> Result<bool> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let client = ViaCepClient::new();

    let address = runtime
        .block_on(client.lookup(cep))
        .with_context(|| format!("Lookup of postal code '{}' failed", cep))?;

    match address {
        Some(address) => {
            println!("{}", serde_json::to_string_pretty(&address)?);
            Ok(true)
        }
        None => {
            println!("{}", format!("Postal code {} not found", cep).yellow());
            Ok(false)
        }
    }
}
