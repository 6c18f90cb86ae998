//! Command-line surface of the `fra` binary.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{PriceArgs, ScenarioArgs, ValidateArgs};

/// Values forward rate agreements from a market file
#[derive(Parser)]
#[command(name = "fra", author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// How results are written
    #[arg(short, long, value_enum, default_value_t, env = "FRA_FORMAT", global = true)]
    pub format: OutputFormat,

    /// More log output on stderr (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Value every FRA, or one with --id
    Price(PriceArgs),

    /// Shift flat curves and roll the evaluation date, then revalue
    Scenario(ScenarioArgs),

    /// Check a market file without valuing anything
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// First row only, as one JSON line
    Minimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fra", "scenario", "--market", "m.toml", "--shift-bps", "-5", "-vv", "-f", "csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Csv);
        match cli.command {
            Commands::Scenario(args) => assert_eq!(args.shift_bps, -5.0),
            _ => panic!("expected scenario"),
        }
    }
}
