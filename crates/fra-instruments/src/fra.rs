//! Forward rate agreement.

use fra_core::calendars::{BusinessDayConvention, Calendar};
use fra_core::daycounts::{DayCount, DayCountConvention};
use fra_core::handle::Handle;
use fra_core::patterns::{CacheState, LazyCache, Observable, Subject};
use fra_core::settings::Settings;
use fra_core::types::Date;
use fra_curves::{Compounding, IborIndex, InterestRate, YieldTermStructure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{InstrumentError, InstrumentResult};
use crate::instrument::Instrument;
use crate::position::Position;

/// How the forward rate of a contract is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// The index fixing for the contract's fixing date.
    IndexedCoupon,
    /// The par rate implied by the index forwarding curve.
    ParApproximation,
    /// The par rate implied by the discount curve; no index.
    CurveOnly,
}

impl fmt::Display for RatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RatePolicy::IndexedCoupon => "Indexed Coupon",
            RatePolicy::ParApproximation => "Par Approximation",
            RatePolicy::CurveOnly => "Curve Only",
        };
        write!(f, "{name}")
    }
}

enum RateSource {
    Indexed(Arc<IborIndex>),
    Par(Arc<IborIndex>),
    Curve { fixing_days: i32 },
}

impl RateSource {
    fn policy(&self) -> RatePolicy {
        match self {
            RateSource::Indexed(_) => RatePolicy::IndexedCoupon,
            RateSource::Par(_) => RatePolicy::ParApproximation,
            RateSource::Curve { .. } => RatePolicy::CurveOnly,
        }
    }

    fn index(&self) -> Option<&Arc<IborIndex>> {
        match self {
            RateSource::Indexed(index) | RateSource::Par(index) => Some(index),
            RateSource::Curve { .. } => None,
        }
    }
}

/// Snapshot of a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraResults {
    /// Forward rate with its basis.
    pub forward_rate: InterestRate,
    /// Settlement amount paid at the value date.
    pub amount: f64,
    /// Present value.
    pub npv: f64,
    /// Whether the contract had expired when valued.
    pub expired: bool,
}

/// A forward rate agreement settled in advance at the value date.
///
/// The long side receives
///
/// ```text
/// amount = N × (F − K) × T / (1 + F × T)
/// ```
///
/// at the value date, where `T` is the accrual fraction from value date to
/// maturity under the forward rate's day counter. The present value is the
/// amount discounted to the reference date of the discount curve, or of the
/// index forwarding curve when no discount curve is linked.
///
/// Valuation is lazy: results are cached until the evaluation date, the
/// discount curve or the index notifies. Expired contracts still report a
/// forward rate but an amount and NPV of zero.
///
/// # Example
///
/// ```rust
/// use fra_core::calendars::BusinessDayConvention;
/// use fra_core::daycounts::DayCountConvention;
/// use fra_core::handle::Handle;
/// use fra_core::settings::Settings;
/// use fra_core::types::Date;
/// use fra_curves::{Compounding, FlatForward, YieldTermStructure};
/// use fra_instruments::{ForwardRateAgreement, Position};
/// use std::sync::Arc;
///
/// let today = Date::from_ymd(2024, 2, 1).unwrap();
/// let settings = Arc::new(Settings::new(today));
/// let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::from_rate(
///     today,
///     0.04,
///     DayCountConvention::Act360,
///     Compounding::Simple,
/// ));
/// let fra = ForwardRateAgreement::with_discount_curve(
///     Date::from_ymd(2024, 3, 1).unwrap(),
///     Date::from_ymd(2024, 6, 1).unwrap(),
///     Position::Long,
///     0.03,
///     1_000_000.0,
///     Handle::new(curve, "discount curve"),
///     2,
///     BusinessDayConvention::ModifiedFollowing,
///     settings,
/// )
/// .unwrap();
///
/// assert!(fra.amount().unwrap() > 0.0);
/// ```
pub struct ForwardRateAgreement {
    value_date: Date,
    maturity_date: Date,
    position: Position,
    strike: InterestRate,
    notional: f64,
    day_count: DayCountConvention,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    source: RateSource,
    discount_curve: Handle<dyn YieldTermStructure>,
    settings: Arc<Settings>,
    cache: LazyCache<FraResults>,
}

impl ForwardRateAgreement {
    /// Creates a contract on an index with an explicit maturity.
    ///
    /// The maturity is adjusted with the index calendar and convention.
    /// With `use_indexed_coupon` the forward rate is the index fixing,
    /// otherwise the par rate of the index forwarding curve. An empty
    /// `discount_curve` discounts on the forwarding curve.
    ///
    /// # Errors
    ///
    /// `InvalidNotional` if `notional` is not positive, `InvalidDates` if
    /// the value date is not before the adjusted maturity.
    #[allow(clippy::too_many_arguments)]
    pub fn with_index(
        value_date: Date,
        maturity_date: Date,
        position: Position,
        strike: f64,
        notional: f64,
        index: Arc<IborIndex>,
        discount_curve: Handle<dyn YieldTermStructure>,
        use_indexed_coupon: bool,
        settings: Arc<Settings>,
    ) -> InstrumentResult<Self> {
        let calendar = index.fixing_calendar();
        let convention = index.business_day_convention();
        let maturity_date = calendar.adjust(maturity_date, convention);
        check_notional(notional)?;
        check_dates(value_date, maturity_date)?;

        let day_count = index.day_counter();
        let source = if use_indexed_coupon {
            RateSource::Indexed(index)
        } else {
            RateSource::Par(index)
        };
        Ok(Self::assemble(
            value_date,
            maturity_date,
            position,
            InterestRate::simple(strike, day_count),
            notional,
            day_count,
            calendar,
            convention,
            source,
            discount_curve,
            settings,
        ))
    }

    /// Creates a contract on an index with the maturity implied by the
    /// index tenor from `value_date`.
    ///
    /// # Errors
    ///
    /// As [`with_index`](Self::with_index); also fails if the maturity
    /// cannot be computed.
    #[allow(clippy::too_many_arguments)]
    pub fn from_index_tenor(
        value_date: Date,
        position: Position,
        strike: f64,
        notional: f64,
        index: Arc<IborIndex>,
        discount_curve: Handle<dyn YieldTermStructure>,
        use_indexed_coupon: bool,
        settings: Arc<Settings>,
    ) -> InstrumentResult<Self> {
        let maturity_date = index.maturity_date(value_date)?;
        Self::with_index(
            value_date,
            maturity_date,
            position,
            strike,
            notional,
            index,
            discount_curve,
            use_indexed_coupon,
            settings,
        )
    }

    /// Creates a contract valued on a discount curve alone.
    ///
    /// Day counter and calendar are those of the curve linked at
    /// construction. The fixing date is `fixing_days` business days before
    /// the value date.
    ///
    /// # Errors
    ///
    /// `InvalidNotional`, `EmptyDiscountCurve` if the handle is unlinked,
    /// `InvalidDates` if the value date is not before the adjusted maturity.
    #[allow(clippy::too_many_arguments)]
    pub fn with_discount_curve(
        value_date: Date,
        maturity_date: Date,
        position: Position,
        strike: f64,
        notional: f64,
        discount_curve: Handle<dyn YieldTermStructure>,
        fixing_days: i32,
        convention: BusinessDayConvention,
        settings: Arc<Settings>,
    ) -> InstrumentResult<Self> {
        check_notional(notional)?;
        let curve = discount_curve
            .current_link()
            .map_err(|_| InstrumentError::EmptyDiscountCurve)?;
        let calendar = curve.calendar();
        let day_count = curve.day_counter();
        let maturity_date = calendar.adjust(maturity_date, convention);
        check_dates(value_date, maturity_date)?;

        Ok(Self::assemble(
            value_date,
            maturity_date,
            position,
            InterestRate::simple(strike, day_count),
            notional,
            day_count,
            calendar,
            convention,
            RateSource::Curve { fixing_days },
            discount_curve,
            settings,
        ))
    }

    /// Starts building a contract.
    #[must_use]
    pub fn builder() -> ForwardRateAgreementBuilder {
        ForwardRateAgreementBuilder::new()
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        value_date: Date,
        maturity_date: Date,
        position: Position,
        strike: InterestRate,
        notional: f64,
        day_count: DayCountConvention,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        source: RateSource,
        discount_curve: Handle<dyn YieldTermStructure>,
        settings: Arc<Settings>,
    ) -> Self {
        let cache = LazyCache::new("fra");
        cache.observe(settings.clone());
        cache.observe(Arc::new(discount_curve.clone()));
        if let Some(index) = source.index() {
            cache.observe(index.clone());
        }

        debug!(
            %value_date,
            %maturity_date,
            %position,
            policy = %source.policy(),
            notional,
            "forward rate agreement created"
        );

        Self {
            value_date,
            maturity_date,
            position,
            strike,
            notional,
            day_count,
            calendar,
            convention,
            source,
            discount_curve,
            settings,
            cache,
        }
    }

    // ---- contract terms ----

    /// Start of the rate period and settlement date.
    #[must_use]
    pub fn value_date(&self) -> Date {
        self.value_date
    }

    /// End of the rate period, business day adjusted.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Long or short.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Strike rate, simply compounded on the contract day counter.
    #[must_use]
    pub fn strike(&self) -> InterestRate {
        self.strike
    }

    /// Notional amount.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Contract day counter.
    #[must_use]
    pub fn day_counter(&self) -> DayCountConvention {
        self.day_count
    }

    /// Contract calendar.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Business day convention of the contract.
    #[must_use]
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// The underlying index, if any.
    #[must_use]
    pub fn index(&self) -> Option<&Arc<IborIndex>> {
        self.source.index()
    }

    /// Handle to the discount curve; may be empty for index contracts.
    #[must_use]
    pub fn discount_curve(&self) -> &Handle<dyn YieldTermStructure> {
        &self.discount_curve
    }

    /// How the forward rate is obtained.
    #[must_use]
    pub fn rate_policy(&self) -> RatePolicy {
        self.source.policy()
    }

    /// Settings supplying the evaluation date.
    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Date the reference rate is fixed.
    ///
    /// Index contracts use the index's rule; curve-only contracts step
    /// back the fixing days on the contract calendar.
    pub fn fixing_date(&self) -> InstrumentResult<Date> {
        match &self.source {
            RateSource::Indexed(index) | RateSource::Par(index) => {
                Ok(index.fixing_date(self.value_date)?)
            }
            RateSource::Curve { fixing_days } => Ok(self.calendar.advance_days(
                self.value_date,
                -fixing_days,
                self.convention,
            )?),
        }
    }

    // ---- valuation ----

    /// Whether the value date has occurred as of the evaluation date.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.settings.has_occurred(self.value_date)
    }

    /// Current valuation, computed if stale.
    pub fn results(&self) -> InstrumentResult<FraResults> {
        self.cache.get_or_compute(|| self.calculate())
    }

    /// Forward rate with its basis. Available for expired contracts.
    pub fn forward_rate(&self) -> InstrumentResult<InterestRate> {
        Ok(self.results()?.forward_rate)
    }

    /// Settlement amount at the value date; zero once expired.
    pub fn amount(&self) -> InstrumentResult<f64> {
        Ok(self.results()?.amount)
    }

    /// Present value; zero once expired.
    pub fn npv(&self) -> InstrumentResult<f64> {
        Ok(self.results()?.npv)
    }

    /// Number of valuations run so far.
    #[must_use]
    pub fn calculation_count(&self) -> u64 {
        self.cache.calculation_count()
    }

    /// Whether cached results are valid.
    #[must_use]
    pub fn is_calculated(&self) -> bool {
        matches!(self.cache.state(), CacheState::Fresh(_))
    }

    fn calculate(&self) -> InstrumentResult<FraResults> {
        let forward_rate = self.calculate_forward_rate()?;

        if self.is_expired() {
            warn!(
                value_date = %self.value_date,
                evaluation_date = %self.settings.evaluation_date(),
                "forward rate agreement has expired"
            );
            return Ok(FraResults {
                forward_rate,
                amount: 0.0,
                npv: 0.0,
                expired: true,
            });
        }

        let f = forward_rate.rate();
        let k = self.strike.rate();
        let t = forward_rate
            .day_counter()
            .year_fraction_f64(self.value_date, self.maturity_date);
        let amount = self.notional * self.position.sign() * (f - k) * t / (1.0 + f * t);
        let discount = self.discounting_curve()?.discount(self.value_date)?;
        let npv = amount * discount;

        debug!(forward = f, strike = k, t, amount, discount, npv, "fra valued");
        Ok(FraResults {
            forward_rate,
            amount,
            npv,
            expired: false,
        })
    }

    fn calculate_forward_rate(&self) -> InstrumentResult<InterestRate> {
        match &self.source {
            RateSource::Indexed(index) => {
                let fixing_date = index.fixing_date(self.value_date)?;
                let fixing = index.fixing(fixing_date)?;
                Ok(InterestRate::simple(fixing, index.day_counter()))
            }
            RateSource::Par(index) => Ok(index.forwarding_curve()?.forward_rate(
                self.value_date,
                self.maturity_date,
                index.day_counter(),
                Compounding::Simple,
            )?),
            RateSource::Curve { .. } => {
                let curve = self.discount_curve.current_link()?;
                Ok(curve.forward_rate(
                    self.value_date,
                    self.maturity_date,
                    curve.day_counter(),
                    Compounding::Simple,
                )?)
            }
        }
    }

    fn discounting_curve(&self) -> InstrumentResult<Arc<dyn YieldTermStructure>> {
        match self.source.index() {
            Some(index) if self.discount_curve.is_empty() => Ok(index.forwarding_curve()?),
            _ => Ok(self.discount_curve.current_link()?),
        }
    }
}

impl Instrument for ForwardRateAgreement {
    fn is_expired(&self) -> bool {
        ForwardRateAgreement::is_expired(self)
    }

    fn npv(&self) -> InstrumentResult<f64> {
        ForwardRateAgreement::npv(self)
    }

    fn recalculate(&self) -> InstrumentResult<()> {
        self.cache.recalculate(|| self.calculate()).map(|_| ())
    }

    fn freeze(&self) {
        self.cache.freeze();
    }

    fn unfreeze(&self) {
        self.cache.unfreeze();
    }
}

impl Subject for ForwardRateAgreement {
    fn observable(&self) -> &Observable {
        self.cache.observable()
    }
}

impl fmt::Debug for ForwardRateAgreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardRateAgreement")
            .field("value_date", &self.value_date)
            .field("maturity_date", &self.maturity_date)
            .field("position", &self.position)
            .field("strike", &self.strike)
            .field("notional", &self.notional)
            .field("policy", &self.source.policy())
            .field("index", &self.source.index().map(|i| i.name().to_string()))
            .field("cache", &self.cache)
            .finish()
    }
}

fn check_notional(notional: f64) -> InstrumentResult<()> {
    if notional > 0.0 && notional.is_finite() {
        Ok(())
    } else {
        Err(InstrumentError::InvalidNotional { notional })
    }
}

fn check_dates(value_date: Date, maturity_date: Date) -> InstrumentResult<()> {
    if value_date < maturity_date {
        Ok(())
    } else {
        Err(InstrumentError::InvalidDates {
            value_date,
            maturity_date,
        })
    }
}

/// Builder for [`ForwardRateAgreement`].
///
/// With an index the contract uses the index conventions and, without an
/// explicit maturity, the index tenor. Without an index a discount curve
/// and a maturity are required. Settings default to
/// [`Settings::global`].
#[derive(Debug, Clone, Default)]
pub struct ForwardRateAgreementBuilder {
    value_date: Option<Date>,
    maturity_date: Option<Date>,
    position: Position,
    strike: Option<f64>,
    notional: Option<f64>,
    index: Option<Arc<IborIndex>>,
    use_indexed_coupon: bool,
    discount_curve: Option<Handle<dyn YieldTermStructure>>,
    fixing_days: Option<i32>,
    convention: Option<BusinessDayConvention>,
    settings: Option<Arc<Settings>>,
}

impl ForwardRateAgreementBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value date.
    #[must_use]
    pub fn value_date(mut self, date: Date) -> Self {
        self.value_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets the position (default long).
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Sets the strike rate.
    #[must_use]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the notional.
    #[must_use]
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the underlying index.
    #[must_use]
    pub fn index(mut self, index: Arc<IborIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Uses the index fixing instead of the par approximation.
    #[must_use]
    pub fn use_indexed_coupon(mut self, enabled: bool) -> Self {
        self.use_indexed_coupon = enabled;
        self
    }

    /// Sets the discount curve handle.
    #[must_use]
    pub fn discount_curve(mut self, handle: Handle<dyn YieldTermStructure>) -> Self {
        self.discount_curve = Some(handle);
        self
    }

    /// Sets the fixing days of a curve-only contract (default 2).
    #[must_use]
    pub fn fixing_days(mut self, days: i32) -> Self {
        self.fixing_days = Some(days);
        self
    }

    /// Sets the convention of a curve-only contract (default modified following).
    #[must_use]
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    /// Sets the settings supplying the evaluation date.
    #[must_use]
    pub fn settings(mut self, settings: Arc<Settings>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Builds the contract.
    ///
    /// # Errors
    ///
    /// `MissingField` for absent required fields, plus any construction
    /// error of the chosen surface.
    pub fn build(self) -> InstrumentResult<ForwardRateAgreement> {
        let value_date = self
            .value_date
            .ok_or_else(|| InstrumentError::missing_field("value_date"))?;
        let strike = self
            .strike
            .ok_or_else(|| InstrumentError::missing_field("strike"))?;
        let notional = self
            .notional
            .ok_or_else(|| InstrumentError::missing_field("notional"))?;
        let settings = self.settings.unwrap_or_else(Settings::global);

        match self.index {
            Some(index) => {
                let discount_curve = self
                    .discount_curve
                    .unwrap_or_else(|| Handle::empty("discount curve"));
                match self.maturity_date {
                    Some(maturity_date) => ForwardRateAgreement::with_index(
                        value_date,
                        maturity_date,
                        self.position,
                        strike,
                        notional,
                        index,
                        discount_curve,
                        self.use_indexed_coupon,
                        settings,
                    ),
                    None => ForwardRateAgreement::from_index_tenor(
                        value_date,
                        self.position,
                        strike,
                        notional,
                        index,
                        discount_curve,
                        self.use_indexed_coupon,
                        settings,
                    ),
                }
            }
            None => {
                let discount_curve = self
                    .discount_curve
                    .ok_or_else(|| InstrumentError::missing_field("discount_curve"))?;
                let maturity_date = self
                    .maturity_date
                    .ok_or_else(|| InstrumentError::missing_field("maturity_date"))?;
                ForwardRateAgreement::with_discount_curve(
                    value_date,
                    maturity_date,
                    self.position,
                    strike,
                    notional,
                    discount_curve,
                    self.fixing_days.unwrap_or(2),
                    self.convention
                        .unwrap_or(BusinessDayConvention::ModifiedFollowing),
                    settings,
                )
            }
        }
    }
}
