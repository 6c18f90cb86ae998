//! TARGET2 calendar for Eurozone payments and securities settlement.

use super::Calendar;
use crate::types::Date;

/// TARGET2 holiday calendar for Eurozone markets.
///
/// ## Holidays
///
/// - Saturdays and Sundays
/// - New Year's Day (January 1)
/// - Good Friday and Easter Monday (since 2000)
/// - Labour Day, May 1 (since 2000)
/// - Christmas Day (December 25)
/// - Boxing Day, December 26 (since 2000)
/// - December 31 in 1998, 1999 and 2001
///
/// Holidays falling on a weekend are not observed on another day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target2Calendar;

impl Calendar for Target2Calendar {
    fn name(&self) -> &'static str {
        "TARGET2"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }

        let (y, m, d) = (date.year(), date.month(), date.day());
        let easter = easter_sunday(y);
        let days_from_easter = easter.days_between(&date);

        let holiday = (m == 1 && d == 1)
            || (y >= 2000 && (days_from_easter == -2 || days_from_easter == 1))
            || (y >= 2000 && m == 5 && d == 1)
            || (m == 12 && d == 25)
            || (y >= 2000 && m == 12 && d == 26)
            || (m == 12 && d == 31 && matches!(y, 1998 | 1999 | 2001));

        !holiday
    }
}

/// Western Easter Sunday (anonymous Gregorian algorithm).
pub(crate) fn easter_sunday(year: i32) -> Date {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    // The algorithm always yields a day in March or April.
    Date::from_ymd(year, month as u32, day as u32).unwrap_or(Date::MIN)
}
