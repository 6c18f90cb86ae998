//! FRA CLI - Command-line interface for forward rate agreement valuation.
//!
//! # Usage
//!
//! ```bash
//! # Price every FRA in a market file
//! fra price --market demos/market.toml
//!
//! # Price one trade as of another date, as JSON
//! fra --format json price --market demos/market.toml --id FRA-CURVE --date 2024-02-15
//!
//! # Shift flat curves by 10bp and roll the evaluation date a week
//! fra scenario --market demos/market.toml --shift-bps 10 --roll-days 7
//!
//! # Check a market file
//! fra validate --market demos/market.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod market;
mod output;

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format;

    match cli.command {
        Commands::Price(args) => commands::price::execute(args, format)?,
        Commands::Scenario(args) => commands::scenario::execute(args, format)?,
        Commands::Validate(args) => commands::validate::execute(args, format)?,
    }

    Ok(())
}
