//! CLI command implementations.

pub mod price;
pub mod scenario;
pub mod validate;

pub use price::PriceArgs;
pub use scenario::ScenarioArgs;
pub use validate::ValidateArgs;

use std::path::Path;

use fra_config::MarketFile;
use fra_instruments::{FraResults, ForwardRateAgreement};
use tracing::{info, warn};

use crate::error::CliResult;

/// Loads a market file, logging where it came from.
pub fn load_market(path: &Path) -> CliResult<MarketFile> {
    let file = fra_config::load(path)?;
    info!(path = %path.display(), fras = file.fras.len(), "market file loaded");
    Ok(file)
}

/// Values one trade, turning a failure into a message.
///
/// A trade that cannot be valued, for instance a past fixing with no stored
/// value, must not stop the rest of the book from being reported.
pub fn value_trade(id: &str, fra: &ForwardRateAgreement) -> Result<FraResults, String> {
    fra.results().map_err(|e| {
        warn!(trade = id, error = %e, "valuation failed");
        e.to_string()
    })
}

/// Status column text: `live`, `expired` or `error: <reason>`.
pub fn status(outcome: &Result<FraResults, String>) -> String {
    match outcome {
        Ok(results) if results.expired => "expired".to_string(),
        Ok(_) => "live".to_string(),
        Err(message) => format!("error: {message}"),
    }
}
