//! Calendar periods ("2D", "3M", "1Y").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar or business days, depending on the operation.
    Days,
    /// Weeks of seven calendar days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A signed length of time such as an index tenor.
///
/// Serializes as its string form so configuration files can write
/// `tenor = "3M"`.
///
/// # Example
///
/// ```rust
/// use fra_core::types::{Period, TimeUnit};
///
/// let p: Period = "6M".parse().unwrap();
/// assert_eq!(p.length(), 6);
/// assert_eq!(p.unit(), TimeUnit::Months);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a new period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Returns the signed length.
    #[must_use]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Returns the unit.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Length in months for month/year periods.
    #[must_use]
    pub fn as_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            TimeUnit::Days | TimeUnit::Weeks => None,
        }
    }

    /// Parses strings such as `"2D"`, `"1W"`, `"3M"`, `"10Y"` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Parse` when the string is not a period.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let unit = match chars.next_back().map(|c| c.to_ascii_uppercase()) {
            Some('D') => TimeUnit::Days,
            Some('W') => TimeUnit::Weeks,
            Some('M') => TimeUnit::Months,
            Some('Y') => TimeUnit::Years,
            _ => return Err(CoreError::parse("period", s)),
        };
        let length = chars
            .as_str()
            .parse::<i32>()
            .map_err(|_| CoreError::parse("period", s))?;
        Ok(Self::new(length, unit))
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Self::Output {
        Period::new(-self.length, self.unit)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_units() {
        assert_eq!(Period::parse("2D").unwrap(), Period::days(2));
        assert_eq!(Period::parse("1w").unwrap(), Period::weeks(1));
        assert_eq!(Period::parse(" 3M ").unwrap(), Period::months(3));
        assert_eq!(Period::parse("10Y").unwrap(), Period::years(10));
        assert_eq!(Period::parse("-2D").unwrap(), Period::days(-2));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Period::parse("").is_err());
        assert!(Period::parse("M").is_err());
        assert!(Period::parse("3Q").is_err());
        assert!(Period::parse("x3M").is_err());
    }

    #[test]
    fn test_display_and_neg() {
        assert_eq!(Period::months(6).to_string(), "6M");
        assert_eq!((-Period::days(2)).to_string(), "-2D");
    }

    #[test]
    fn test_as_months() {
        assert_eq!(Period::years(2).as_months(), Some(24));
        assert_eq!(Period::months(3).as_months(), Some(3));
        assert_eq!(Period::weeks(1).as_months(), None);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Period::months(3)).unwrap();
        assert_eq!(json, "\"3M\"");
        let back: Period = serde_json::from_str("\"1Y\"").unwrap();
        assert_eq!(back, Period::years(1));
        assert!(serde_json::from_str::<Period>("\"bad\"").is_err());
    }
}
