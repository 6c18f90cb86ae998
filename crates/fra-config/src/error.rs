//! Configuration error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration operation result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// The file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported format.
    #[error("Unsupported configuration format: {} (expected .toml or .json)", path.display())]
    UnsupportedFormat {
        /// The file path.
        path: PathBuf,
    },

    /// Content could not be parsed.
    #[error("Invalid {format}: {message}")]
    Parse {
        /// Format being parsed.
        format: &'static str,
        /// Parser message.
        message: String,
    },

    /// Validation error.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Multiple validation errors.
    #[error("{} validation errors, first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    MultipleValidationErrors(Vec<ValidationError>),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            format: "JSON",
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation, e.g. `fras[2].notional`.
    pub field: String,
    /// Validation error message.
    pub message: String,
    /// Validation rule that was violated.
    pub rule: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Creates a validation error with a rule name.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref rule) = self.rule {
            write!(f, "{}: {} (rule: {})", self.field, self.message, rule)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Positive(f64);

    impl Validate for Positive {
        fn validate(&self) -> Vec<ValidationError> {
            if self.0 > 0.0 {
                Vec::new()
            } else {
                vec![ValidationError::with_rule("value", "must be positive", "positive")]
            }
        }
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("fras[0].notional", "must be positive");
        assert_eq!(err.to_string(), "fras[0].notional: must be positive");

        let err = ValidationError::with_rule("curves[1].name", "duplicate", "unique");
        assert_eq!(err.to_string(), "curves[1].name: duplicate (rule: unique)");
    }

    #[test]
    fn test_validate_or_error() {
        assert!(Positive(1.0).validate_or_error().is_ok());
        assert!(Positive(1.0).is_valid());
        match Positive(-1.0).validate_or_error() {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "value"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
