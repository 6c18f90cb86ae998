//! Scenario command implementation.
//!
//! Prices the book, then moves the market in place and prices it again.
//! Only trades the move actually touches are recomputed.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{load_market, status, value_trade};
use crate::error::CliError;
use crate::market::LiveMarket;
use crate::output::{display_amount, print_header, print_output};

/// Arguments for the scenario command.
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Market file (TOML or JSON)
    #[arg(short, long)]
    pub market: PathBuf,

    /// Parallel shift applied to every flat curve, in basis points
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub shift_bps: f64,

    /// Days to roll the evaluation date forward (negative rolls back)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub roll_days: i64,

    /// Run the scenario for this trade only
    #[arg(long)]
    pub id: Option<String>,
}

/// Base and scenario value of one trade.
#[derive(Debug, Serialize, Tabled)]
pub struct ScenarioRow {
    #[tabled(rename = "Trade")]
    pub id: String,
    #[tabled(rename = "Base NPV", display_with = "display_amount")]
    pub base_npv: Option<f64>,
    #[tabled(rename = "Scenario NPV", display_with = "display_amount")]
    pub scenario_npv: Option<f64>,
    #[tabled(rename = "Change", display_with = "display_amount")]
    pub change: Option<f64>,
    #[tabled(rename = "Recalcs")]
    pub recalculations: u64,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Execute the scenario command.
pub fn execute(args: ScenarioArgs, format: OutputFormat) -> Result<()> {
    let file = load_market(&args.market)?;
    let market = LiveMarket::build(&file, args.id.as_deref())?;

    let base: Vec<(Option<f64>, u64)> = market
        .trades()
        .iter()
        .map(|(id, fra)| {
            let npv = value_trade(id, fra).ok().map(|r| r.npv);
            (npv, fra.calculation_count())
        })
        .collect();

    if args.shift_bps != 0.0 {
        market.shift_flat_curves(args.shift_bps / 10_000.0)?;
    }
    if args.roll_days != 0 {
        let rolled = market
            .evaluation_date()
            .try_add_days(args.roll_days)
            .map_err(CliError::from)?;
        market.set_evaluation_date(rolled);
    }

    let rows: Vec<ScenarioRow> = market
        .trades()
        .iter()
        .zip(base)
        .map(|((id, fra), (base_npv, base_count))| {
            let outcome = value_trade(id, fra);
            let scenario_npv = outcome.as_ref().ok().map(|r| r.npv);
            ScenarioRow {
                id: id.clone(),
                base_npv,
                scenario_npv,
                change: base_npv.zip(scenario_npv).map(|(b, s)| s - b),
                recalculations: fra.calculation_count() - base_count,
                status: status(&outcome),
            }
        })
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!(
            "Scenario: {:+}bp, evaluation date {}",
            args.shift_bps,
            market.evaluation_date()
        ));
    }
    print_output(&rows, format)?;
    Ok(())
}
