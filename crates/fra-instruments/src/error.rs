//! Error types for instrument construction and valuation.

use fra_core::types::Date;
use fra_core::CoreError;
use fra_curves::CurveError;
use thiserror::Error;

/// A specialized Result type for instrument operations.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors that can occur when building or valuing instruments.
///
/// Construction problems have their own variants. Failures of market data
/// collaborators during valuation pass through unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Notional is not a positive number.
    #[error("Notional must be positive, got {notional}")]
    InvalidNotional {
        /// The rejected notional.
        notional: f64,
    },

    /// Value date is not strictly before the adjusted maturity date.
    #[error("Value date {value_date} must be before maturity date {maturity_date}")]
    InvalidDates {
        /// Contract value date.
        value_date: Date,
        /// Maturity date after business day adjustment.
        maturity_date: Date,
    },

    /// A required builder field was not set.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: &'static str,
    },

    /// A curve-only contract was given an unlinked discount curve.
    #[error("Discount curve handle is empty")]
    EmptyDiscountCurve,

    /// Curve or index failure.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Core library failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl InstrumentError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
