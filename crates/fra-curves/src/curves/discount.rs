//! Discount factor curve interpolated log-linearly between pillars.

use fra_core::calendars::CalendarId;
use fra_core::daycounts::{DayCount, DayCountConvention};
use fra_core::patterns::{Observable, Subject};
use fra_core::types::Date;
use std::fmt;

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldTermStructure;

/// A curve defined by discount factors at pillar dates.
///
/// Between pillars `ln P(t)` is linear in time (piecewise flat forwards),
/// so pillar values are reproduced exactly. Outside the pillar range the
/// nearest segment's forward rate is continued; past the last pillar this
/// requires extrapolation to be enabled.
///
/// Build one with [`DiscountCurve::builder`].
pub struct DiscountCurve {
    dates: Vec<Date>,
    times: Vec<f64>,
    log_dfs: Vec<f64>,
    day_count: DayCountConvention,
    calendar_id: CalendarId,
    extrapolate: bool,
    observable: Observable,
}

impl DiscountCurve {
    /// Starts building a curve.
    #[must_use]
    pub fn builder() -> DiscountCurveBuilder {
        DiscountCurveBuilder::default()
    }

    /// Pillar dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Pillar discount factors.
    #[must_use]
    pub fn discount_factors(&self) -> Vec<f64> {
        self.log_dfs.iter().map(|l| l.exp()).collect()
    }

    fn interpolate(&self, i: usize, t: f64) -> f64 {
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let (l0, l1) = (self.log_dfs[i], self.log_dfs[i + 1]);
        l0 + (t - t0) / (t1 - t0) * (l1 - l0)
    }
}

impl YieldTermStructure for DiscountCurve {
    fn reference_date(&self) -> Date {
        self.dates[0]
    }

    fn day_counter(&self) -> DayCountConvention {
        self.day_count
    }

    fn calendar_id(&self) -> CalendarId {
        self.calendar_id
    }

    fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        if !t.is_finite() {
            return Err(CurveError::invalid_value("time", format!("{t} is not finite")));
        }
        let last = self.times.len() - 1;
        // Index of the segment [times[i], times[i + 1]] used for t.
        let i = match self.times.partition_point(|&x| x <= t) {
            0 => 0,
            p if p > last => last - 1,
            p => p - 1,
        };
        Ok(self.interpolate(i, t).exp())
    }
}

impl Subject for DiscountCurve {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for DiscountCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountCurve")
            .field("reference_date", &self.dates[0])
            .field("pillars", &self.dates.len())
            .field("day_count", &self.day_count)
            .field("extrapolate", &self.extrapolate)
            .finish()
    }
}

/// Builder for [`DiscountCurve`].
///
/// # Example
///
/// ```rust
/// use fra_core::types::Date;
/// use fra_curves::{DiscountCurve, YieldTermStructure};
///
/// let curve = DiscountCurve::builder()
///     .pillar(Date::from_ymd(2024, 1, 2).unwrap(), 1.0)
///     .pillar(Date::from_ymd(2025, 1, 2).unwrap(), 0.96)
///     .build()
///     .unwrap();
/// assert_eq!(curve.discount(Date::from_ymd(2025, 1, 2).unwrap()).unwrap(), 0.96);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiscountCurveBuilder {
    pillars: Vec<(Date, f64)>,
    day_count: Option<DayCountConvention>,
    calendar_id: Option<CalendarId>,
    extrapolate: bool,
}

impl DiscountCurveBuilder {
    /// Adds a pillar.
    pub fn pillar(mut self, date: Date, discount_factor: f64) -> Self {
        self.pillars.push((date, discount_factor));
        self
    }

    /// Adds several pillars.
    pub fn pillars(mut self, pillars: impl IntoIterator<Item = (Date, f64)>) -> Self {
        self.pillars.extend(pillars);
        self
    }

    /// Sets the day counter (default ACT/365F).
    pub fn day_counter(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the calendar (default NULL).
    pub fn calendar(mut self, calendar_id: CalendarId) -> Self {
        self.calendar_id = Some(calendar_id);
        self
    }

    /// Allows queries past the last pillar.
    pub fn extrapolate(mut self, enabled: bool) -> Self {
        self.extrapolate = enabled;
        self
    }

    /// Validates the pillars and builds the curve.
    ///
    /// The first pillar is the reference date and must carry a discount
    /// factor of one.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidPillars` for fewer than two pillars,
    /// non-increasing dates, non-positive factors or a first factor
    /// different from one.
    pub fn build(self) -> CurveResult<DiscountCurve> {
        let pillars = self.pillars;
        if pillars.len() < 2 {
            return Err(CurveError::invalid_pillars(format!(
                "need at least 2 pillars, got {}",
                pillars.len()
            )));
        }
        for window in pillars.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(CurveError::invalid_pillars(format!(
                    "dates must increase: {} follows {}",
                    window[1].0, window[0].0
                )));
            }
        }
        if let Some((date, df)) = pillars.iter().find(|(_, df)| !(*df > 0.0 && df.is_finite())) {
            return Err(CurveError::invalid_pillars(format!(
                "discount factor {df} at {date} must be positive"
            )));
        }
        if (pillars[0].1 - 1.0).abs() > 1e-12 {
            return Err(CurveError::invalid_pillars(format!(
                "discount factor at reference date {} must be 1, got {}",
                pillars[0].0, pillars[0].1
            )));
        }

        let day_count = self.day_count.unwrap_or(DayCountConvention::Act365Fixed);
        let reference = pillars[0].0;
        let times = pillars
            .iter()
            .map(|(date, _)| day_count.year_fraction_f64(reference, *date))
            .collect();

        Ok(DiscountCurve {
            dates: pillars.iter().map(|(date, _)| *date).collect(),
            times,
            log_dfs: pillars.iter().map(|(_, df)| df.ln()).collect(),
            day_count,
            calendar_id: self.calendar_id.unwrap_or(CalendarId::Null),
            extrapolate: self.extrapolate,
            observable: Observable::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn curve() -> DiscountCurve {
        DiscountCurve::builder()
            .pillar(d(2024, 2, 1), 1.0)
            .pillar(d(2024, 3, 1), 0.995)
            .pillar(d(2024, 6, 1), 0.995 / 1.015)
            .day_counter(DayCountConvention::Thirty360US)
            .build()
            .unwrap()
    }

    #[test]
    fn test_pillars_are_exact() {
        let c = curve();
        assert_eq!(c.discount(d(2024, 2, 1)).unwrap(), 1.0);
        assert_relative_eq!(c.discount(d(2024, 3, 1)).unwrap(), 0.995, epsilon = 1e-15);
        assert_relative_eq!(
            c.discount(d(2024, 6, 1)).unwrap(),
            0.995 / 1.015,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_log_linear_midpoint() {
        let c = DiscountCurve::builder()
            .pillar(d(2024, 1, 1), 1.0)
            .pillar(d(2024, 12, 31), 0.9)
            .day_counter(DayCountConvention::Act360)
            .build()
            .unwrap();
        let mid = d(2024, 1, 1).add_days(182);
        let t = 182.0 / 365.0;
        assert_relative_eq!(c.discount(mid).unwrap(), 0.9_f64.powf(t), epsilon = 1e-12);
    }

    #[test]
    fn test_range_check() {
        let c = curve();
        let err = c.discount(d(2024, 7, 1)).unwrap_err();
        assert!(matches!(err, CurveError::DateOutOfRange { .. }));
    }

    #[test]
    fn test_extrapolation_continues_last_forward() {
        let c = DiscountCurve::builder()
            .pillar(d(2024, 1, 1), 1.0)
            .pillar(d(2025, 1, 1), 0.95)
            .day_counter(DayCountConvention::Act365Fixed)
            .extrapolate(true)
            .build()
            .unwrap();
        let t1 = 366.0 / 365.0;
        let t2 = 731.0 / 365.0;
        let expected = (0.95_f64.ln() / t1 * t2).exp();
        assert_relative_eq!(c.discount(d(2026, 1, 1)).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_before_reference_uses_first_segment() {
        let c = curve();
        let df = c.discount(d(2024, 1, 1)).unwrap();
        assert!(df > 1.0);
    }

    #[test]
    fn test_builder_validation() {
        assert!(DiscountCurve::builder().pillar(d(2024, 1, 1), 1.0).build().is_err());
        assert!(DiscountCurve::builder()
            .pillar(d(2024, 1, 1), 1.0)
            .pillar(d(2024, 1, 1), 0.99)
            .build()
            .is_err());
        assert!(DiscountCurve::builder()
            .pillar(d(2024, 1, 1), 1.0)
            .pillar(d(2024, 6, 1), -0.5)
            .build()
            .is_err());
        assert!(DiscountCurve::builder()
            .pillar(d(2024, 1, 1), 0.99)
            .pillar(d(2024, 6, 1), 0.98)
            .build()
            .is_err());
    }
}
