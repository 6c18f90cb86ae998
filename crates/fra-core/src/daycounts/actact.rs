//! Actual/Actual ISDA day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// Splits the period at year boundaries; each piece is divided by the
/// length of its own year (365 or 366).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start;

        // Whole-year boundaries are crossed on January 1st.
        while current.year() < end.year() {
            let next_year = Date::from_ymd(current.year() + 1, 1, 1).unwrap_or(end);
            let days = current.days_between(&next_year);
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
            current = next_year;
        }

        if current < end {
            let days = current.days_between(&end);
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_actact_isda_within_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 7, 1).unwrap();
        assert_eq!(dc.year_fraction(start, end), dec!(182) / dec!(366));
    }

    #[test]
    fn test_actact_isda_spanning_years() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2024, 11, 1).unwrap();
        let end = Date::from_ymd(2025, 2, 1).unwrap();

        // 61 days in 2024 (leap), 31 days in 2025
        let expected = dec!(61) / dec!(366) + dec!(31) / dec!(365);
        assert_eq!(dc.year_fraction(start, end), expected);
        assert_eq!(dc.day_count(start, end), 92);
        assert_relative_eq!(
            dc.year_fraction_f64(start, end),
            61.0 / 366.0 + 31.0 / 365.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_actact_isda_full_years() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2023, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(dc.year_fraction(start, end), dec!(2));
    }
}
