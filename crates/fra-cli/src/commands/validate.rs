//! Validate command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use fra_config::Validate;

use crate::cli::OutputFormat;
use crate::commands::load_market;
use crate::error::CliError;
use crate::output::{print_error, print_success};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Market file (TOML or JSON)
    #[arg(short, long)]
    pub market: PathBuf,
}

/// Execute the validate command.
pub fn execute(args: ValidateArgs, format: OutputFormat) -> Result<()> {
    let file = load_market(&args.market)?;

    let errors = file.validate();
    if errors.is_empty() {
        if format == OutputFormat::Json {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "curves": file.curves.len(),
                    "indices": file.indices.len(),
                    "fras": file.fras.len(),
                })
            );
        } else {
            print_success(&format!(
                "{} is valid: {} curve(s), {} index(es), {} FRA(s)",
                args.market.display(),
                file.curves.len(),
                file.indices.len(),
                file.fras.len()
            ));
        }
        return Ok(());
    }

    for error in &errors {
        print_error(&error.to_string());
    }
    Err(CliError::InvalidMarket {
        count: errors.len(),
    }
    .into())
}
