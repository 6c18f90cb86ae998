//! Ibor-style term rate indices with fixing history.

use fra_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use fra_core::daycounts::{DayCount, DayCountConvention};
use fra_core::handle::Handle;
use fra_core::patterns::{Observable, Relay, Subject, Subscription};
use fra_core::settings::Settings;
use fra_core::types::{Date, Period};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::YieldTermStructure;

/// Market conventions of an Ibor index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IborConventions {
    /// Family name, e.g. "Euribor".
    pub family: String,
    /// Tenor of the underlying deposit.
    pub tenor: Period,
    /// Business days between fixing and value date.
    pub fixing_days: i32,
    /// Fixing calendar.
    pub calendar: CalendarId,
    /// Convention used to roll the maturity date.
    pub convention: BusinessDayConvention,
    /// Whether maturities of month-end starts stay at month end.
    pub end_of_month: bool,
    /// Accrual day count.
    pub day_count: DayCountConvention,
}

impl IborConventions {
    /// Euribor conventions: TARGET2, T+2, ACT/360, modified following, end-of-month.
    #[must_use]
    pub fn euribor(tenor: Period) -> Self {
        Self {
            family: "Euribor".to_string(),
            tenor,
            fixing_days: 2,
            calendar: CalendarId::Target2,
            convention: BusinessDayConvention::ModifiedFollowing,
            end_of_month: true,
            day_count: DayCountConvention::Act360,
        }
    }
}

/// An interest rate index fixing a deposit rate for a given tenor.
///
/// Past fixings come from the stored history; future fixings are forecast
/// from the forwarding curve. The index is a subject relaying changes of
/// its forwarding curve and of the evaluation date, and notifying when
/// fixings are added.
pub struct IborIndex {
    conventions: IborConventions,
    name: String,
    calendar: Arc<dyn Calendar>,
    forwarding: Handle<dyn YieldTermStructure>,
    settings: Arc<Settings>,
    fixings: RwLock<BTreeMap<Date, f64>>,
    observable: Arc<Observable>,
    _inputs: Subscription,
}

impl IborIndex {
    /// Creates an index.
    #[must_use]
    pub fn new(
        conventions: IborConventions,
        forwarding: Handle<dyn YieldTermStructure>,
        settings: Arc<Settings>,
    ) -> Self {
        let observable = Observable::shared();
        let mut inputs = Subscription::new(Relay::new(&observable, "ibor-index"));
        inputs.observe(Arc::new(forwarding.clone()));
        inputs.observe(settings.clone());

        let name = format!("{}{}", conventions.family, conventions.tenor);
        let calendar = conventions.calendar.calendar();
        Self {
            conventions,
            name,
            calendar,
            forwarding,
            settings,
            fixings: RwLock::new(BTreeMap::new()),
            observable,
            _inputs: inputs,
        }
    }

    /// Creates a Euribor index of the given tenor.
    #[must_use]
    pub fn euribor(
        tenor: Period,
        forwarding: Handle<dyn YieldTermStructure>,
        settings: Arc<Settings>,
    ) -> Self {
        Self::new(IborConventions::euribor(tenor), forwarding, settings)
    }

    /// Index name, e.g. "Euribor3M".
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index conventions.
    #[must_use]
    pub fn conventions(&self) -> &IborConventions {
        &self.conventions
    }

    /// Tenor of the index.
    #[must_use]
    pub fn tenor(&self) -> Period {
        self.conventions.tenor
    }

    /// Business days between fixing and value date.
    #[must_use]
    pub fn fixing_days(&self) -> i32 {
        self.conventions.fixing_days
    }

    /// Fixing calendar.
    #[must_use]
    pub fn fixing_calendar(&self) -> Arc<dyn Calendar> {
        Arc::clone(&self.calendar)
    }

    /// Business day convention for maturities.
    #[must_use]
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.conventions.convention
    }

    /// End-of-month rule for maturities.
    #[must_use]
    pub fn end_of_month(&self) -> bool {
        self.conventions.end_of_month
    }

    /// Accrual day count.
    #[must_use]
    pub fn day_counter(&self) -> DayCountConvention {
        self.conventions.day_count
    }

    /// Handle to the forwarding curve.
    #[must_use]
    pub fn forwarding_handle(&self) -> &Handle<dyn YieldTermStructure> {
        &self.forwarding
    }

    /// The forwarding curve currently linked.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyHandle` (wrapped) if no curve is linked.
    pub fn forwarding_curve(&self) -> CurveResult<Arc<dyn YieldTermStructure>> {
        Ok(self.forwarding.current_link()?)
    }

    /// Settings the index reads the evaluation date from.
    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Returns true if fixings are published on `date`.
    #[must_use]
    pub fn is_valid_fixing_date(&self, date: Date) -> bool {
        self.calendar.is_business_day(date)
    }

    /// Fixing date for a deposit starting on `value_date`.
    pub fn fixing_date(&self, value_date: Date) -> CurveResult<Date> {
        Ok(self.calendar.advance_days(
            value_date,
            -self.conventions.fixing_days,
            BusinessDayConvention::Following,
        )?)
    }

    /// Value date of a deposit fixed on `fixing_date`.
    pub fn value_date(&self, fixing_date: Date) -> CurveResult<Date> {
        self.ensure_fixing_date(fixing_date)?;
        Ok(self.calendar.advance_days(
            fixing_date,
            self.conventions.fixing_days,
            BusinessDayConvention::Following,
        )?)
    }

    /// Maturity of a deposit starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> CurveResult<Date> {
        Ok(self.calendar.advance(
            value_date,
            self.conventions.tenor,
            self.conventions.convention,
            self.conventions.end_of_month,
        )?)
    }

    /// Index fixing for `fixing_date`.
    ///
    /// Past dates read the stored history, future dates are forecast, and
    /// today uses a stored fixing when present and a forecast otherwise.
    ///
    /// # Errors
    ///
    /// `InvalidFixingDate` for non-business days, `MissingFixing` for past
    /// dates without history, and any forwarding-curve failure.
    pub fn fixing(&self, fixing_date: Date) -> CurveResult<f64> {
        self.fixing_with(fixing_date, false)
    }

    /// As [`fixing`](Self::fixing), optionally forecasting today's fixing
    /// even when one is stored.
    pub fn fixing_with(&self, fixing_date: Date, forecast_todays_fixing: bool) -> CurveResult<f64> {
        self.ensure_fixing_date(fixing_date)?;
        let today = self.settings.evaluation_date();

        if fixing_date > today || (fixing_date == today && forecast_todays_fixing) {
            return self.forecast_fixing(fixing_date);
        }

        match self.past_fixing(fixing_date) {
            Some(value) => {
                trace!(index = %self.name, %fixing_date, value, "stored fixing");
                Ok(value)
            }
            None if fixing_date == today => self.forecast_fixing(fixing_date),
            None => Err(CurveError::missing_fixing(&self.name, fixing_date)),
        }
    }

    /// Fixing implied by the forwarding curve.
    pub fn forecast_fixing(&self, fixing_date: Date) -> CurveResult<f64> {
        let start = self.value_date(fixing_date)?;
        let end = self.maturity_date(start)?;
        let curve = self.forwarding_curve()?;
        let t = self.conventions.day_count.year_fraction_f64(start, end);
        let value = (curve.discount(start)? / curve.discount(end)? - 1.0) / t;
        trace!(index = %self.name, %fixing_date, value, "forecast fixing");
        Ok(value)
    }

    /// Stored fixing for a date, if any.
    #[must_use]
    pub fn past_fixing(&self, fixing_date: Date) -> Option<f64> {
        self.fixings.read().get(&fixing_date).copied()
    }

    /// Stores a fixing and notifies observers.
    ///
    /// # Errors
    ///
    /// `InvalidFixingDate` for non-business days, `InvalidValue` for a
    /// non-finite value, `DuplicateFixing` when a different value is
    /// stored and `force_overwrite` is false.
    pub fn add_fixing(&self, date: Date, value: f64, force_overwrite: bool) -> CurveResult<()> {
        self.add_fixings([(date, value)], force_overwrite)
    }

    /// Stores several fixings atomically and notifies observers once.
    ///
    /// Nothing is stored if any fixing is rejected.
    pub fn add_fixings(
        &self,
        fixings: impl IntoIterator<Item = (Date, f64)>,
        force_overwrite: bool,
    ) -> CurveResult<()> {
        let fixings: Vec<(Date, f64)> = fixings.into_iter().collect();
        {
            let mut history = self.fixings.write();
            for &(date, value) in &fixings {
                self.ensure_fixing_date(date)?;
                if !value.is_finite() {
                    return Err(CurveError::invalid_value(
                        "fixing",
                        format!("{value} for {date} is not finite"),
                    ));
                }
                if let Some(&existing) = history.get(&date) {
                    if existing != value && !force_overwrite {
                        return Err(CurveError::DuplicateFixing {
                            index: self.name.clone(),
                            date,
                            existing,
                            new: value,
                        });
                    }
                }
            }
            for &(date, value) in &fixings {
                history.insert(date, value);
            }
        }
        debug!(index = %self.name, count = fixings.len(), "fixings added");
        self.observable.notify_observers();
        Ok(())
    }

    /// Removes every stored fixing and notifies observers.
    pub fn clear_fixings(&self) {
        self.fixings.write().clear();
        self.observable.notify_observers();
    }

    /// Number of stored fixings.
    #[must_use]
    pub fn fixing_count(&self) -> usize {
        self.fixings.read().len()
    }

    fn ensure_fixing_date(&self, date: Date) -> CurveResult<()> {
        if self.is_valid_fixing_date(date) {
            Ok(())
        } else {
            Err(CurveError::InvalidFixingDate {
                index: self.name.clone(),
                date,
            })
        }
    }
}

impl Subject for IborIndex {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IborIndex")
            .field("name", &self.name)
            .field("conventions", &self.conventions)
            .field("forwarding", &self.forwarding)
            .field("fixings", &self.fixings.read().len())
            .finish()
    }
}
