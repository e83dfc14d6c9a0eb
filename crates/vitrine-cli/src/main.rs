mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version, about = "Vitrine CLI - storefront form masks and validators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask a value the way the form input would display it
    Mask {
        /// Field kind (cpf, phone, cep, card, expiry, email, date, text)
        kind: String,

        /// Raw or partially masked value
        value: String,
    },

    /// Run the dedicated validator of a field kind
    Check {
        /// Field kind (cpf, phone, email, date, ...)
        kind: String,

        value: String,

        /// Reference date for age checks (defaults to the local date)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
    },

    /// Print the latest birth date accepted by the age check
    #[command(name = "max-birth-date")]
    MaxBirthDate {
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
    },

    /// Validate a JSON object of field values against a configured form
    Form {
        /// Path to vitrine.toml (built-in forms are used when it is missing)
        #[arg(short, long, default_value = "vitrine.toml")]
        config: PathBuf,

        /// Form name, e.g. checkout or registration
        #[arg(short, long)]
        form: String,

        /// JSON file with an object of field id -> value
        #[arg(long)]
        values: PathBuf,

        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a postal code on ViaCEP
    #[cfg(feature = "viacep")]
    Lookup {
        /// Postal code, masked or not
        cep: String,
    },
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    vitrine_validation::parse_date(value)
        .ok_or_else(|| format!("'{}' is not a YYYY-MM-DD or DD/MM/YYYY date", value))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Mask { kind, value } => commands::mask::execute(&kind, &value),
        Commands::Check { kind, value, today } => commands::check::execute(&kind, &value, today),
        Commands::MaxBirthDate { today } => commands::check::max_birth_date(today),
        Commands::Form {
            config,
            form,
            values,
            today,
            json,
        } => commands::form::execute(&config, &form, &values, today, json),
        #[cfg(feature = "viacep")]
        Commands::Lookup { cep } => commands::lookup::execute(&cep),
    }
}

fn main() -> Result<ExitCode> {
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Commands report whether the input passed; errors propagate as usual
    if run(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
