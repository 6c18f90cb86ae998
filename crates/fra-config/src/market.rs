//! Market and trade file model.
//!
//! A market file describes an evaluation date, the curves and indices of a
//! market, and the FRAs to value on it. Curves and indices are referred to
//! by name.

use fra_core::calendars::{BusinessDayConvention, CalendarId};
use fra_core::daycounts::DayCountConvention;
use fra_core::types::{Date, Period};
use fra_curves::Compounding;
use fra_instruments::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Validate, ValidationError};

// =============================================================================
// CURVES
// =============================================================================

/// A named yield curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveConfig {
    /// Flat forward curve on a single quoted rate.
    Flat(FlatCurveConfig),
    /// Log-linear discount factor curve.
    Discount(DiscountCurveConfig),
}

impl CurveConfig {
    /// Name the curve is referred to by.
    pub fn name(&self) -> &str {
        match self {
            CurveConfig::Flat(c) => &c.name,
            CurveConfig::Discount(c) => &c.name,
        }
    }
}

/// Flat forward curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCurveConfig {
    /// Curve name.
    pub name: String,
    /// Quoted rate as a decimal.
    pub rate: f64,
    /// Fixed reference date; the curve floats on the evaluation date when absent.
    #[serde(default)]
    pub reference_date: Option<Date>,
    /// Business days from evaluation date to reference date of a floating curve.
    #[serde(default)]
    pub settlement_days: i32,
    /// Day count of the quoted rate.
    #[serde(default = "default_curve_day_count")]
    pub day_count: DayCountConvention,
    /// Compounding of the quoted rate.
    #[serde(default = "default_compounding")]
    pub compounding: Compounding,
    /// Curve calendar.
    #[serde(default)]
    pub calendar: CalendarId,
}

/// Discount factor curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurveConfig {
    /// Curve name.
    pub name: String,
    /// Pillars; the first is the reference date with factor 1.
    pub pillars: Vec<PillarConfig>,
    /// Day count mapping dates to curve time.
    #[serde(default = "default_curve_day_count")]
    pub day_count: DayCountConvention,
    /// Curve calendar.
    #[serde(default)]
    pub calendar: CalendarId,
    /// Whether dates past the last pillar may be queried.
    #[serde(default)]
    pub extrapolate: bool,
}

/// A discount factor at a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarConfig {
    /// Pillar date.
    pub date: Date,
    /// Discount factor.
    pub discount_factor: f64,
}

// =============================================================================
// INDICES
// =============================================================================

/// An Ibor index.
///
/// Conventions default to Euribor's; any field set here overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Name the index is referred to by.
    pub name: String,
    /// Index family, e.g. "Euribor".
    #[serde(default = "default_family")]
    pub family: String,
    /// Deposit tenor.
    pub tenor: Period,
    /// Name of the forwarding curve.
    pub forwarding_curve: String,
    /// Business days between fixing and value date.
    #[serde(default)]
    pub fixing_days: Option<i32>,
    /// Fixing calendar.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Maturity roll convention.
    #[serde(default)]
    pub convention: Option<BusinessDayConvention>,
    /// End-of-month rule.
    #[serde(default)]
    pub end_of_month: Option<bool>,
    /// Accrual day count.
    #[serde(default)]
    pub day_count: Option<DayCountConvention>,
    /// Historical fixings.
    #[serde(default)]
    pub fixings: Vec<FixingConfig>,
}

/// A published index fixing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixingConfig {
    /// Fixing date.
    pub date: Date,
    /// Fixing value as a decimal.
    pub value: f64,
}

// =============================================================================
// TRADES
// =============================================================================

/// A forward rate agreement.
///
/// With `index` set the contract follows the index conventions and, without
/// a maturity, the index tenor. Without an index it is valued on
/// `discount_curve` alone and needs a maturity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraConfig {
    /// Trade identifier.
    pub id: String,
    /// Start of the rate period.
    pub value_date: Date,
    /// End of the rate period, before adjustment.
    #[serde(default)]
    pub maturity_date: Option<Date>,
    /// Long or short.
    #[serde(default)]
    pub position: Position,
    /// Strike rate as a decimal.
    pub strike: f64,
    /// Notional amount.
    pub notional: f64,
    /// Name of the underlying index.
    #[serde(default)]
    pub index: Option<String>,
    /// Use the index fixing rather than the par approximation.
    #[serde(default)]
    pub use_indexed_coupon: bool,
    /// Name of the discount curve.
    #[serde(default)]
    pub discount_curve: Option<String>,
    /// Fixing days of a curve-only contract.
    #[serde(default = "default_fixing_days")]
    pub fixing_days: i32,
    /// Convention of a curve-only contract.
    #[serde(default = "default_convention")]
    pub business_day_convention: BusinessDayConvention,
}

// =============================================================================
// MARKET FILE
// =============================================================================

/// Root of a market file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketFile {
    /// Evaluation date.
    pub evaluation_date: Date,
    /// Whether events on the evaluation date count as not yet occurred.
    #[serde(default)]
    pub include_reference_date_events: bool,
    /// Yield curves.
    #[serde(default)]
    pub curves: Vec<CurveConfig>,
    /// Ibor indices.
    #[serde(default)]
    pub indices: Vec<IndexConfig>,
    /// Trades to value.
    #[serde(default)]
    pub fras: Vec<FraConfig>,
}

impl MarketFile {
    /// Looks up a curve by name.
    pub fn curve(&self, name: &str) -> Option<&CurveConfig> {
        self.curves.iter().find(|c| c.name() == name)
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexConfig> {
        self.indices.iter().find(|i| i.name == name)
    }

    /// Looks up a trade by id.
    pub fn fra(&self, id: &str) -> Option<&FraConfig> {
        self.fras.iter().find(|f| f.id == id)
    }
}

fn default_curve_day_count() -> DayCountConvention {
    DayCountConvention::Act365Fixed
}

fn default_compounding() -> Compounding {
    Compounding::Continuous
}

fn default_family() -> String {
    "Euribor".to_string()
}

fn default_fixing_days() -> i32 {
    2
}

fn default_convention() -> BusinessDayConvention {
    BusinessDayConvention::ModifiedFollowing
}

// =============================================================================
// VALIDATION
// =============================================================================

fn check_unique<'a>(
    names: impl Iterator<Item = &'a str>,
    section: &str,
    key: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for (i, name) in names.enumerate() {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{section}[{i}].{key}"),
                "cannot be empty",
            ));
        } else if !seen.insert(name) {
            errors.push(ValidationError::with_rule(
                format!("{section}[{i}].{key}"),
                format!("duplicate {key} '{name}'"),
                "unique",
            ));
        }
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        match self {
            CurveConfig::Flat(c) => {
                if !c.rate.is_finite() {
                    errors.push(ValidationError::new("rate", "must be finite"));
                }
                if c.reference_date.is_some() && c.settlement_days != 0 {
                    errors.push(ValidationError::new(
                        "settlement_days",
                        "only applies to curves without a reference date",
                    ));
                }
            }
            CurveConfig::Discount(c) => {
                if c.pillars.len() < 2 {
                    errors.push(ValidationError::with_rule(
                        "pillars",
                        format!("need at least 2, got {}", c.pillars.len()),
                        "min_pillars",
                    ));
                }
                for (i, pair) in c.pillars.windows(2).enumerate() {
                    if pair[1].date <= pair[0].date {
                        errors.push(ValidationError::with_rule(
                            format!("pillars[{}].date", i + 1),
                            format!("{} does not follow {}", pair[1].date, pair[0].date),
                            "increasing",
                        ));
                    }
                }
                for (i, p) in c.pillars.iter().enumerate() {
                    if !(p.discount_factor > 0.0 && p.discount_factor.is_finite()) {
                        errors.push(ValidationError::with_rule(
                            format!("pillars[{i}].discount_factor"),
                            format!("{} must be positive", p.discount_factor),
                            "positive",
                        ));
                    }
                }
                if let Some(first) = c.pillars.first() {
                    if (first.discount_factor - 1.0).abs() > 1e-12 {
                        errors.push(ValidationError::new(
                            "pillars[0].discount_factor",
                            "must be 1 at the reference date",
                        ));
                    }
                }
            }
        }
        errors
    }
}

impl Validate for IndexConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.tenor.length() <= 0 {
            errors.push(ValidationError::new("tenor", "must be positive"));
        }
        if matches!(self.fixing_days, Some(n) if n < 0) {
            errors.push(ValidationError::new("fixing_days", "cannot be negative"));
        }
        for (i, f) in self.fixings.iter().enumerate() {
            if !f.value.is_finite() {
                errors.push(ValidationError::new(
                    format!("fixings[{i}].value"),
                    "must be finite",
                ));
            }
        }
        errors
    }
}

impl Validate for FraConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.notional > 0.0 && self.notional.is_finite()) {
            errors.push(ValidationError::with_rule(
                "notional",
                format!("{} must be positive", self.notional),
                "positive",
            ));
        }
        if !self.strike.is_finite() {
            errors.push(ValidationError::new("strike", "must be finite"));
        }
        if let Some(maturity) = self.maturity_date {
            if maturity <= self.value_date {
                errors.push(ValidationError::new(
                    "maturity_date",
                    format!("{maturity} is not after value date {}", self.value_date),
                ));
            }
        }
        if self.index.is_none() {
            if self.discount_curve.is_none() {
                errors.push(ValidationError::new(
                    "discount_curve",
                    "required when no index is given",
                ));
            }
            if self.maturity_date.is_none() {
                errors.push(ValidationError::new(
                    "maturity_date",
                    "required when no index is given",
                ));
            }
            if self.use_indexed_coupon {
                errors.push(ValidationError::new(
                    "use_indexed_coupon",
                    "requires an index",
                ));
            }
        }
        if self.fixing_days < 0 {
            errors.push(ValidationError::new("fixing_days", "cannot be negative"));
        }
        errors
    }
}

fn prefixed(section: &str, i: usize, errors: Vec<ValidationError>) -> Vec<ValidationError> {
    errors
        .into_iter()
        .map(|mut e| {
            e.field = format!("{section}[{i}].{}", e.field);
            e
        })
        .collect()
}

impl Validate for MarketFile {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_unique(self.curves.iter().map(CurveConfig::name), "curves", "name", &mut errors);
        check_unique(
            self.indices.iter().map(|i| i.name.as_str()),
            "indices",
            "name",
            &mut errors,
        );
        check_unique(self.fras.iter().map(|f| f.id.as_str()), "fras", "id", &mut errors);

        for (i, curve) in self.curves.iter().enumerate() {
            errors.extend(prefixed("curves", i, curve.validate()));
        }

        for (i, index) in self.indices.iter().enumerate() {
            errors.extend(prefixed("indices", i, index.validate()));
            if self.curve(&index.forwarding_curve).is_none() {
                errors.push(ValidationError::with_rule(
                    format!("indices[{i}].forwarding_curve"),
                    format!("unknown curve '{}'", index.forwarding_curve),
                    "reference",
                ));
            }
        }

        for (i, fra) in self.fras.iter().enumerate() {
            errors.extend(prefixed("fras", i, fra.validate()));
            if let Some(name) = &fra.index {
                if self.index(name).is_none() {
                    errors.push(ValidationError::with_rule(
                        format!("fras[{i}].index"),
                        format!("unknown index '{name}'"),
                        "reference",
                    ));
                }
            }
            if let Some(name) = &fra.discount_curve {
                if self.curve(name).is_none() {
                    errors.push(ValidationError::with_rule(
                        format!("fras[{i}].discount_curve"),
                        format!("unknown curve '{name}'"),
                        "reference",
                    ));
                }
            }
        }

        errors
    }
}
