//! Long/short position of a contract.

use fra_core::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a forward rate agreement.
///
/// A long FRA gains when the realised rate ends above the strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Pays the strike, receives the realised rate.
    #[default]
    Long,
    /// Receives the strike, pays the realised rate.
    Short,
}

impl Position {
    /// +1 for long, -1 for short.
    #[must_use]
    pub fn sign(&self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }

    /// The other side.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Position::Long => Position::Short,
            Position::Short => Position::Long,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Long => write!(f, "Long"),
            Position::Short => write!(f, "Short"),
        }
    }
}

impl FromStr for Position {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Position::Long),
            "short" | "sell" => Ok(Position::Short),
            _ => Err(CoreError::parse("position", s)),
        }
    }
}
