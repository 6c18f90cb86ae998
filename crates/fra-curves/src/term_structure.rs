//! The yield term structure abstraction.

use fra_core::calendars::{Calendar, CalendarId};
use fra_core::daycounts::{DayCount, DayCountConvention};
use fra_core::patterns::Subject;
use fra_core::types::Date;
use std::fmt;
use std::sync::Arc;

use crate::compounding::{Compounding, InterestRate};
use crate::error::{CurveError, CurveResult};

/// A discount curve anchored at a reference date.
///
/// Implementors provide discount factors on their own time axis; dates are
/// mapped to times with the curve's day counter. Curves are subjects: they
/// notify observers whenever their data or reference date changes.
pub trait YieldTermStructure: Subject + Send + Sync + fmt::Debug {
    /// Date at which discount factors equal one.
    fn reference_date(&self) -> Date;

    /// Day counter mapping dates to curve time.
    fn day_counter(&self) -> DayCountConvention;

    /// Calendar of the curve's market.
    fn calendar_id(&self) -> CalendarId;

    /// Last date covered without extrapolation.
    fn max_date(&self) -> Date {
        Date::MAX
    }

    /// Whether dates past [`max_date`](Self::max_date) may be queried.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Discount factor at curve time `t`.
    fn discount_t(&self, t: f64) -> CurveResult<f64>;

    /// Calendar instance for [`calendar_id`](Self::calendar_id).
    fn calendar(&self) -> Arc<dyn Calendar> {
        self.calendar_id().calendar()
    }

    /// Curve time of a date.
    fn time_from_reference(&self, date: Date) -> f64 {
        self.day_counter()
            .year_fraction_f64(self.reference_date(), date)
    }

    /// Fails if `date` lies beyond the curve and extrapolation is off.
    fn check_range(&self, date: Date) -> CurveResult<()> {
        let max_date = self.max_date();
        if date > max_date && !self.allows_extrapolation() {
            return Err(CurveError::DateOutOfRange { date, max_date });
        }
        Ok(())
    }

    /// Discount factor for a date.
    fn discount(&self, date: Date) -> CurveResult<f64> {
        self.check_range(date)?;
        self.discount_t(self.time_from_reference(date))
    }

    /// Zero rate from the reference date to `date`.
    fn zero_rate(
        &self,
        date: Date,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> CurveResult<InterestRate> {
        let df = self.discount(date)?;
        InterestRate::implied_rate_between(
            1.0 / df,
            day_count,
            compounding,
            self.reference_date(),
            date,
        )
    }

    /// Forward rate between two dates.
    fn forward_rate(
        &self,
        start: Date,
        end: Date,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> CurveResult<InterestRate> {
        let compound = self.discount(start)? / self.discount(end)?;
        InterestRate::implied_rate_between(compound, day_count, compounding, start, end)
    }
}
