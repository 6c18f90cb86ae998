//! Price command implementation.
//!
//! Values every FRA in a market file as of its evaluation date, or as of
//! an overriding date.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use fra_core::types::Date;
use fra_instruments::{ForwardRateAgreement, Position, RatePolicy};

use crate::cli::OutputFormat;
use crate::commands::{load_market, status, value_trade};
use crate::market::LiveMarket;
use crate::output::{display_amount, display_date, display_percent, print_header, print_output};

/// Arguments for the price command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Market file (TOML or JSON)
    #[arg(short, long)]
    pub market: PathBuf,

    /// Evaluation date (YYYY-MM-DD). Defaults to the one in the file.
    #[arg(short, long)]
    pub date: Option<Date>,

    /// Price only the trade with this id
    #[arg(long)]
    pub id: Option<String>,
}

/// One priced trade.
#[derive(Debug, Serialize, Tabled)]
pub struct FraRow {
    #[tabled(rename = "Trade")]
    pub id: String,
    #[tabled(rename = "Rate")]
    pub policy: RatePolicy,
    #[tabled(rename = "Side")]
    pub position: Position,
    #[tabled(rename = "Fixing", display_with = "display_date")]
    pub fixing_date: Option<Date>,
    #[tabled(rename = "Value Date")]
    pub value_date: Date,
    #[tabled(rename = "Maturity")]
    pub maturity_date: Date,
    #[tabled(rename = "Forward", display_with = "display_percent")]
    pub forward_rate: Option<f64>,
    #[tabled(rename = "Amount", display_with = "display_amount")]
    pub amount: Option<f64>,
    #[tabled(rename = "NPV", display_with = "display_amount")]
    pub npv: Option<f64>,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl FraRow {
    /// Values `fra` and records the outcome.
    pub fn new(id: &str, fra: &ForwardRateAgreement) -> Self {
        let mut row = Self {
            id: id.to_string(),
            policy: fra.rate_policy(),
            position: fra.position(),
            fixing_date: fra.fixing_date().ok(),
            value_date: fra.value_date(),
            maturity_date: fra.maturity_date(),
            forward_rate: None,
            amount: None,
            npv: None,
            status: String::new(),
        };
        let outcome = value_trade(id, fra);
        if let Ok(results) = &outcome {
            row.forward_rate = Some(results.forward_rate.rate());
            row.amount = Some(results.amount);
            row.npv = Some(results.npv);
        }
        row.status = status(&outcome);
        row
    }
}

/// Execute the price command.
pub fn execute(args: PriceArgs, format: OutputFormat) -> Result<()> {
    let file = load_market(&args.market)?;
    let market = LiveMarket::build(&file, args.id.as_deref())?;
    if let Some(date) = args.date {
        market.set_evaluation_date(date);
    }

    let rows: Vec<FraRow> = market
        .trades()
        .iter()
        .map(|(id, fra)| FraRow::new(id, fra))
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("FRA valuation as of {}", market.evaluation_date()));
    }
    print_output(&rows, format)?;
    Ok(())
}
