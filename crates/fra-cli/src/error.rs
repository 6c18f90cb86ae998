//! CLI error types.

use fra_config::ConfigError;
use fra_core::error::CoreError;
use fra_curves::CurveError;
use fra_instruments::InstrumentError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// No trade with the requested id.
    #[error("Unknown trade: {0}")]
    UnknownTrade(String),

    /// A name in the market file does not resolve.
    #[error("Unknown {kind}: {name}")]
    UnknownReference {
        /// What was looked up.
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// The market file failed validation.
    #[error("Market file has {count} validation error(s)")]
    InvalidMarket {
        /// Number of problems found.
        count: usize,
    },

    /// Date arithmetic on user input failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Loading or validating configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Building a curve or index failed.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Building a trade failed.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
