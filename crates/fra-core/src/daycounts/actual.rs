//! Actual-day conventions over a fixed year basis.
//!
//! ACT/360 is the money-market basis of Euribor fixings and FRA accruals;
//! ACT/365F is the usual time axis of discount curves.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

fn actual_over(basis: u32, start: Date, end: Date) -> Decimal {
    Decimal::from(start.days_between(&end)) / Decimal::from(basis)
}

/// Actual days over a 360-day year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

/// Actual days over a 365-day year, leap years included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        actual_over(360, start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        actual_over(365, start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
