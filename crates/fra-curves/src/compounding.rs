//! Compounding conventions and interest rates with an explicit basis.
//!
//! # Example
//!
//! ```rust
//! use fra_curves::Compounding;
//!
//! let rate = 0.05; // 5% rate
//! let t = 2.0;     // 2 years
//!
//! let df_continuous = Compounding::Continuous.discount_factor(rate, t);
//! let df_annual = Compounding::Annual.discount_factor(rate, t);
//!
//! // Continuous compounding gives slightly lower DF
//! assert!(df_continuous < df_annual);
//! ```

use fra_core::daycounts::{DayCount, DayCountConvention};
use fra_core::types::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CurveError, CurveResult};

/// Interest compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// Simple interest (no compounding)
    #[default]
    Simple,
    /// Annual compounding (1x per year)
    Annual,
    /// Semi-annual compounding (2x per year)
    #[serde(alias = "semiannual")]
    SemiAnnual,
    /// Quarterly compounding (4x per year)
    Quarterly,
    /// Monthly compounding (12x per year)
    Monthly,
    /// Continuous compounding
    Continuous,
}

impl Compounding {
    /// Compounding periods per year; `None` for Simple and Continuous.
    #[must_use]
    pub fn periods_per_year_opt(&self) -> Option<u32> {
        match self {
            Compounding::Simple | Compounding::Continuous => None,
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
        }
    }

    /// Growth of one unit invested at `rate` for `t` years.
    #[must_use]
    pub fn compound_factor(&self, rate: f64, t: f64) -> f64 {
        match (self, self.periods_per_year_opt()) {
            (Compounding::Simple, _) => 1.0 + rate * t,
            (Compounding::Continuous, _) => (rate * t).exp(),
            (_, Some(n)) => {
                let n = f64::from(n);
                (1.0 + rate / n).powf(n * t)
            }
            (_, None) => 1.0 + rate * t,
        }
    }

    /// Present value of one unit paid in `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        if t == 0.0 {
            return 1.0;
        }
        1.0 / self.compound_factor(rate, t)
    }

    /// Rate implied by a compound factor over `t` years (`t > 0`).
    #[must_use]
    pub fn implied_rate(&self, compound: f64, t: f64) -> f64 {
        if compound == 1.0 {
            return 0.0;
        }
        match (self, self.periods_per_year_opt()) {
            (Compounding::Simple, _) => (compound - 1.0) / t,
            (Compounding::Continuous, _) => compound.ln() / t,
            (_, Some(n)) => {
                let n = f64::from(n);
                (compound.powf(1.0 / (n * t)) - 1.0) * n
            }
            (_, None) => (compound - 1.0) / t,
        }
    }

    /// Zero rate implied by a discount factor over `t` years (`t > 0`).
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        self.implied_rate(1.0 / df, t)
    }

    /// Converts a rate to the equivalent rate under another convention.
    #[must_use]
    pub fn convert_to(&self, rate: f64, target: Compounding, t: f64) -> f64 {
        target.implied_rate(self.compound_factor(rate, t), t)
    }

    fn description(self) -> &'static str {
        match self {
            Compounding::Simple => "simple compounding",
            Compounding::Annual => "annual compounding",
            Compounding::SemiAnnual => "semi-annual compounding",
            Compounding::Quarterly => "quarterly compounding",
            Compounding::Monthly => "monthly compounding",
            Compounding::Continuous => "continuous compounding",
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semi-Annual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

/// An interest rate together with its day count and compounding.
///
/// A bare number is ambiguous; the basis tells how to turn the rate into
/// accrual over a date interval.
///
/// ```rust
/// use fra_core::daycounts::DayCountConvention;
/// use fra_curves::InterestRate;
///
/// let r = InterestRate::simple(0.06, DayCountConvention::Act360);
/// assert_eq!(r.to_string(), "6.000000 % ACT/360 simple compounding");
/// assert!((r.compound_factor(0.25) - 1.015).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    rate: f64,
    day_count: DayCountConvention,
    compounding: Compounding,
}

impl InterestRate {
    /// Creates an interest rate.
    #[must_use]
    pub fn new(rate: f64, day_count: DayCountConvention, compounding: Compounding) -> Self {
        Self {
            rate,
            day_count,
            compounding,
        }
    }

    /// Creates a simply compounded rate.
    #[must_use]
    pub fn simple(rate: f64, day_count: DayCountConvention) -> Self {
        Self::new(rate, day_count, Compounding::Simple)
    }

    /// The rate as a decimal (0.05 = 5%).
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The day count the rate accrues under.
    #[must_use]
    pub fn day_counter(&self) -> DayCountConvention {
        self.day_count
    }

    /// The compounding convention.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Compound factor over `t` years.
    #[must_use]
    pub fn compound_factor(&self, t: f64) -> f64 {
        self.compounding.compound_factor(self.rate, t)
    }

    /// Compound factor between two dates under the rate's own day count.
    #[must_use]
    pub fn compound_factor_between(&self, start: Date, end: Date) -> f64 {
        self.compound_factor(self.day_count.year_fraction_f64(start, end))
    }

    /// Discount factor over `t` years.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        1.0 / self.compound_factor(t)
    }

    /// Discount factor between two dates under the rate's own day count.
    #[must_use]
    pub fn discount_factor_between(&self, start: Date, end: Date) -> f64 {
        1.0 / self.compound_factor_between(start, end)
    }

    /// Rate implied by a compound factor over `t` years.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidValue` if the compound factor is not
    /// positive or `t` is not positive.
    pub fn implied_rate(
        compound: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
        t: f64,
    ) -> CurveResult<Self> {
        if !(compound > 0.0) {
            return Err(CurveError::invalid_value(
                "compound factor",
                format!("{compound} must be positive"),
            ));
        }
        if !(t > 0.0) {
            return Err(CurveError::invalid_value(
                "time",
                format!("{t} must be positive to imply a rate"),
            ));
        }
        Ok(Self::new(
            compounding.implied_rate(compound, t),
            day_count,
            compounding,
        ))
    }

    /// Rate implied by a compound factor between two dates.
    ///
    /// # Errors
    ///
    /// As [`InterestRate::implied_rate`]; also fails when `end <= start`.
    pub fn implied_rate_between(
        compound: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
        start: Date,
        end: Date,
    ) -> CurveResult<Self> {
        let t = day_count.year_fraction_f64(start, end);
        Self::implied_rate(compound, day_count, compounding, t)
    }

    /// The equivalent rate under another compounding over `t` years.
    ///
    /// # Errors
    ///
    /// As [`InterestRate::implied_rate`].
    pub fn equivalent_rate(&self, compounding: Compounding, t: f64) -> CurveResult<Self> {
        Self::implied_rate(self.compound_factor(t), self.day_count, compounding, t)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} % {} {}",
            self.rate * 100.0,
            self.day_count.name(),
            self.compounding.description()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Compounding; 6] = [
        Compounding::Continuous,
        Compounding::Annual,
        Compounding::SemiAnnual,
        Compounding::Quarterly,
        Compounding::Monthly,
        Compounding::Simple,
    ];

    #[test]
    fn test_discount_factor_continuous() {
        let df = Compounding::Continuous.discount_factor(0.05, 1.0);
        assert_relative_eq!(df, (-0.05_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_discount_factor_semi_annual() {
        let df = Compounding::SemiAnnual.discount_factor(0.05, 1.0);
        // DF = (1 + 0.025)^(-2) ≈ 0.9518
        assert_relative_eq!(df, (1.0 + 0.025_f64).powf(-2.0), epsilon = 1e-10);
    }

    #[test]
    fn test_discount_factor_simple() {
        let df = Compounding::Simple.discount_factor(0.05, 0.5);
        assert_relative_eq!(df, 1.0 / 1.025, epsilon = 1e-10);
    }

    #[test]
    fn test_roundtrip_all_compounding() {
        for compounding in ALL {
            let df = compounding.discount_factor(0.05, 2.0);
            let recovered = compounding.zero_rate(df, 2.0);
            assert_relative_eq!(recovered, 0.05, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_convert_continuous_to_annual() {
        let annual = Compounding::Continuous.convert_to(0.05, Compounding::Annual, 1.0);
        assert_relative_eq!(annual, (0.05_f64).exp() - 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_time_returns_one() {
        for compounding in ALL {
            assert_eq!(compounding.discount_factor(0.05, 0.0), 1.0);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Compounding::Continuous.to_string(), "Continuous");
        assert_eq!(Compounding::SemiAnnual.to_string(), "Semi-Annual");
    }

    #[test]
    fn test_interest_rate_display() {
        let r = InterestRate::new(0.0325, DayCountConvention::Act365Fixed, Compounding::Continuous);
        assert_eq!(r.to_string(), "3.250000 % ACT/365F continuous compounding");
    }

    #[test]
    fn test_compound_factor_between_dates() {
        let r = InterestRate::simple(0.06, DayCountConvention::Thirty360US);
        let start = Date::from_ymd(2024, 3, 1).unwrap();
        let end = Date::from_ymd(2024, 6, 1).unwrap();
        assert_relative_eq!(r.compound_factor_between(start, end), 1.015, epsilon = 1e-12);
        assert_relative_eq!(r.discount_factor_between(start, end), 1.0 / 1.015, epsilon = 1e-12);
    }

    #[test]
    fn test_implied_rate_validation() {
        let dc = DayCountConvention::Act360;
        assert!(InterestRate::implied_rate(0.0, dc, Compounding::Simple, 1.0).is_err());
        assert!(InterestRate::implied_rate(1.01, dc, Compounding::Simple, 0.0).is_err());
        let r = InterestRate::implied_rate(1.015, dc, Compounding::Simple, 0.25).unwrap();
        assert_relative_eq!(r.rate(), 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_rate() {
        let r = InterestRate::new(0.05, DayCountConvention::Act365Fixed, Compounding::Annual);
        let cont = r.equivalent_rate(Compounding::Continuous, 1.0).unwrap();
        assert_relative_eq!(cont.rate(), (1.05_f64).ln(), epsilon = 1e-12);
        assert_eq!(cont.day_counter(), DayCountConvention::Act365Fixed);
    }

    #[test]
    fn test_serde() {
        let r = InterestRate::simple(0.05, DayCountConvention::Act360);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"ACT/360\""));
        assert!(json.contains("\"simple\""));
        let back: InterestRate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
