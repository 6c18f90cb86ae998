//! Error types for the core layer.
//!
//! Collaborators further up the stack (curves, indices, instruments) wrap
//! [`CoreError`] with `#[from]` so a failure raised here surfaces unchanged.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period string or value could not be interpreted.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// Description of the period error.
        message: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCountError {
        /// Description of the error.
        reason: String,
    },

    /// A handle was dereferenced while not linked to any object.
    #[error("Empty handle: {what} is not linked")]
    EmptyHandle {
        /// What the handle was expected to point to.
        what: String,
    },

    /// A textual value could not be parsed.
    #[error("Cannot parse {kind} from '{input}'")]
    Parse {
        /// Kind of value being parsed.
        kind: &'static str,
        /// The offending input.
        input: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            message: message.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates an empty handle error.
    #[must_use]
    pub fn empty_handle(what: impl Into<String>) -> Self {
        Self::EmptyHandle { what: what.into() }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(kind: &'static str, input: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_empty_handle_display() {
        let err = CoreError::empty_handle("discount curve");
        assert_eq!(err.to_string(), "Empty handle: discount curve is not linked");
    }

    #[test]
    fn test_parse_display() {
        let err = CoreError::parse("period", "3Q");
        assert_eq!(err.to_string(), "Cannot parse period from '3Q'");
    }
}
