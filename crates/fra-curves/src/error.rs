//! Error types for curve and index operations.

use fra_core::types::Date;
use fra_core::CoreError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curves, quotes and indices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Requested date lies beyond the curve and extrapolation is disabled.
    #[error("Date {date} is past the curve's max date {max_date}")]
    DateOutOfRange {
        /// The requested date.
        date: Date,
        /// Last date the curve covers.
        max_date: Date,
    },

    /// Pillar data cannot build a curve.
    #[error("Invalid pillars: {reason}")]
    InvalidPillars {
        /// Description of the problem.
        reason: String,
    },

    /// A numeric input or result is unusable.
    #[error("Invalid value for {what}: {reason}")]
    InvalidValue {
        /// Name of the offending value.
        what: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// The date is not a valid fixing date for the index.
    #[error("{date} is not a valid fixing date for {index}")]
    InvalidFixingDate {
        /// Index name.
        index: String,
        /// The rejected date.
        date: Date,
    },

    /// A past fixing was requested but is not stored.
    #[error("Missing {index} fixing for {date}")]
    MissingFixing {
        /// Index name.
        index: String,
        /// Fixing date.
        date: Date,
    },

    /// A different fixing is already stored for the date.
    #[error("Duplicate {index} fixing for {date}: stored {existing}, new {new}")]
    DuplicateFixing {
        /// Index name.
        index: String,
        /// Fixing date.
        date: Date,
        /// Stored value.
        existing: f64,
        /// Rejected value.
        new: f64,
    },

    /// Error from the core layer (calendars, handles, parsing).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid pillars error.
    #[must_use]
    pub fn invalid_pillars(reason: impl Into<String>) -> Self {
        Self::InvalidPillars {
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            what,
            reason: reason.into(),
        }
    }

    /// Creates a missing fixing error.
    #[must_use]
    pub fn missing_fixing(index: impl Into<String>, date: Date) -> Self {
        Self::MissingFixing {
            index: index.into(),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let date = Date::from_ymd(2024, 2, 29).unwrap();
        let err = CurveError::missing_fixing("Euribor3M", date);
        assert_eq!(err.to_string(), "Missing Euribor3M fixing for 2024-02-29");
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: CurveError = CoreError::empty_handle("forwarding curve").into();
        assert_eq!(err.to_string(), "Empty handle: forwarding curve is not linked");
    }
}
