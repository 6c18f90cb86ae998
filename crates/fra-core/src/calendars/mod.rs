//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with adjustment and period arithmetic
//! - Business day adjustment conventions
//! - Null, weekend-only and TARGET2 calendars, selectable by [`CalendarId`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod conventions;
mod target2;

pub use conventions::{adjust, BusinessDayConvention};
pub use target2::Target2Calendar;

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period, TimeUnit};

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync + fmt::Debug {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Returns true if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        date.month() != self.adjust(date.add_days(1), BusinessDayConvention::Following).month()
    }

    /// Returns the last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Advances a date by a period.
    ///
    /// Day periods count business days (a zero-day period just adjusts
    /// the date). Week periods move calendar weeks and then adjust. Month
    /// and year periods move calendar months; with `end_of_month` set and
    /// a start on the last business day of its month, the result is the
    /// last business day of the target month, otherwise it is adjusted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> CoreResult<Date> {
        let n = period.length();
        match period.unit() {
            TimeUnit::Days => {
                if n == 0 {
                    return Ok(self.adjust(date, convention));
                }
                let step: i64 = if n > 0 { 1 } else { -1 };
                let mut result = date;
                for _ in 0..n.unsigned_abs() {
                    result = result.try_add_days(step)?;
                    while self.is_holiday(result) {
                        result = result.try_add_days(step)?;
                    }
                }
                Ok(result)
            }
            TimeUnit::Weeks => Ok(self.adjust(date.add_period(period)?, convention)),
            TimeUnit::Months | TimeUnit::Years => {
                let moved = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date) {
                    Ok(self.end_of_month(moved))
                } else {
                    Ok(self.adjust(moved, convention))
                }
            }
        }
    }

    /// Advances a date by a signed number of business days.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    fn advance_days(
        &self,
        date: Date,
        days: i32,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        self.advance(date, Period::days(days), convention, false)
    }

    /// Counts business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A calendar on which every day is a business day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Identifier for the built-in calendars, used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarId {
    /// Every day is a business day.
    #[serde(rename = "NULL")]
    Null,
    /// Saturdays and Sundays only.
    #[serde(rename = "WEEKEND")]
    Weekend,
    /// Eurozone TARGET2 calendar.
    #[default]
    #[serde(rename = "TARGET2", alias = "TARGET")]
    Target2,
}

impl CalendarId {
    /// Returns a shared instance of the calendar.
    #[must_use]
    pub fn calendar(&self) -> Arc<dyn Calendar> {
        match self {
            CalendarId::Null => Arc::new(NullCalendar),
            CalendarId::Weekend => Arc::new(WeekendCalendar),
            CalendarId::Target2 => Arc::new(Target2Calendar),
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarId::Null => "NULL",
            CalendarId::Weekend => "WEEKEND",
            CalendarId::Target2 => "TARGET2",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NULL" | "NONE" => Ok(CalendarId::Null),
            "WEEKEND" | "WEEKENDS" => Ok(CalendarId::Weekend),
            "TARGET2" | "TARGET" => Ok(CalendarId::Target2),
            _ => Err(CoreError::parse("calendar", s)),
        }
    }
}
