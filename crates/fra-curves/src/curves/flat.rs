//! Flat forward curve driven by a single quote.

use fra_core::calendars::{BusinessDayConvention, CalendarId};
use fra_core::daycounts::DayCountConvention;
use fra_core::patterns::{Observable, Relay, Subject, Subscription};
use fra_core::settings::Settings;
use fra_core::types::Date;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::compounding::{Compounding, InterestRate};
use crate::error::CurveResult;
use crate::quote::SimpleQuote;
use crate::term_structure::YieldTermStructure;

#[derive(Debug)]
enum Anchor {
    Fixed(Date),
    Floating {
        settings: Arc<Settings>,
        settlement_days: i32,
    },
}

/// A curve with one constant rate for all maturities.
///
/// The rate is read from a [`SimpleQuote`] on every query, so changing the
/// quote moves the curve; the curve relays the quote's notifications. A
/// floating curve takes its reference date from [`Settings`] and also
/// relays evaluation date changes.
///
/// Times before the reference date are valid and compound backwards.
///
/// # Example
///
/// ```rust
/// use fra_core::calendars::CalendarId;
/// use fra_core::daycounts::DayCountConvention;
/// use fra_core::types::Date;
/// use fra_curves::{Compounding, FlatForward, SimpleQuote, YieldTermStructure};
/// use std::sync::Arc;
///
/// let quote = Arc::new(SimpleQuote::new(0.05));
/// let curve = FlatForward::fixed(
///     Date::from_ymd(2024, 1, 2).unwrap(),
///     quote.clone(),
///     DayCountConvention::Act365Fixed,
///     Compounding::Continuous,
///     CalendarId::Target2,
/// );
/// let one_year = Date::from_ymd(2025, 1, 1).unwrap();
/// let df = curve.discount(one_year).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-12);
/// ```
pub struct FlatForward {
    anchor: Anchor,
    quote: Arc<SimpleQuote>,
    day_count: DayCountConvention,
    compounding: Compounding,
    calendar_id: CalendarId,
    observable: Arc<Observable>,
    _inputs: Subscription,
}

impl FlatForward {
    /// Creates a curve anchored at a fixed reference date.
    #[must_use]
    pub fn fixed(
        reference_date: Date,
        quote: Arc<SimpleQuote>,
        day_count: DayCountConvention,
        compounding: Compounding,
        calendar_id: CalendarId,
    ) -> Self {
        Self::build(
            Anchor::Fixed(reference_date),
            quote,
            day_count,
            compounding,
            calendar_id,
        )
    }

    /// Creates a curve whose reference date is the evaluation date
    /// advanced by `settlement_days` business days.
    #[must_use]
    pub fn floating(
        settings: Arc<Settings>,
        settlement_days: i32,
        quote: Arc<SimpleQuote>,
        day_count: DayCountConvention,
        compounding: Compounding,
        calendar_id: CalendarId,
    ) -> Self {
        Self::build(
            Anchor::Floating {
                settings,
                settlement_days,
            },
            quote,
            day_count,
            compounding,
            calendar_id,
        )
    }

    /// Creates a fixed curve from a plain rate with its own quote.
    #[must_use]
    pub fn from_rate(
        reference_date: Date,
        rate: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
    ) -> Self {
        Self::fixed(
            reference_date,
            Arc::new(SimpleQuote::new(rate)),
            day_count,
            compounding,
            CalendarId::Null,
        )
    }

    fn build(
        anchor: Anchor,
        quote: Arc<SimpleQuote>,
        day_count: DayCountConvention,
        compounding: Compounding,
        calendar_id: CalendarId,
    ) -> Self {
        let observable = Observable::shared();
        let mut inputs = Subscription::new(Relay::new(&observable, "flat-forward"));
        inputs.observe(quote.clone());
        if let Anchor::Floating { settings, .. } = &anchor {
            inputs.observe(settings.clone());
        }

        Self {
            anchor,
            quote,
            day_count,
            compounding,
            calendar_id,
            observable,
            _inputs: inputs,
        }
    }

    /// The quote driving the curve.
    #[must_use]
    pub fn quote(&self) -> &Arc<SimpleQuote> {
        &self.quote
    }

    /// The curve's flat rate with its basis.
    pub fn rate(&self) -> CurveResult<InterestRate> {
        Ok(InterestRate::new(
            self.quote.value()?,
            self.day_count,
            self.compounding,
        ))
    }

    /// The compounding of the quoted rate.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }
}

impl YieldTermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        match &self.anchor {
            Anchor::Fixed(date) => *date,
            Anchor::Floating {
                settings,
                settlement_days,
            } => {
                let today = settings.evaluation_date();
                self.calendar_id
                    .calendar()
                    .advance_days(today, *settlement_days, BusinessDayConvention::Following)
                    .unwrap_or_else(|e| {
                        warn!(
                            %today,
                            settlement_days = *settlement_days,
                            error = %e,
                            "settlement date out of range, anchoring on the evaluation date"
                        );
                        today
                    })
            }
        }
    }

    fn day_counter(&self) -> DayCountConvention {
        self.day_count
    }

    fn calendar_id(&self) -> CalendarId {
        self.calendar_id
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        Ok(self.rate()?.discount_factor(t))
    }
}

impl Subject for FlatForward {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for FlatForward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatForward")
            .field("anchor", &self.anchor)
            .field("quote", &self.quote)
            .field("day_count", &self.day_count)
            .field("compounding", &self.compounding)
            .field("calendar", &self.calendar_id)
            .finish()
    }
}
