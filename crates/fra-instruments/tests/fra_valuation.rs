//! Integration test: FRA valuation across the three rate policies.
//!
//! Market: flat 3.5% continuous curve (ACT/365F) behind a relinkable
//! handle, Euribor 3M on top of it, evaluation date 2024-02-01.
//!
//! | Contract        | Value date | Maturity   | Strike |
//! |-----------------|------------|------------|--------|
//! | Euribor 3M FRA  | 2024-03-04 | 2024-06-04 | 3.00%  |
//! | Curve-only FRA  | 2024-03-01 | 2024-06-01 | 5.00%  |

use approx::assert_relative_eq;
use fra_core::prelude::*;
use fra_curves::prelude::*;
use fra_instruments::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

struct Market {
    settings: Arc<Settings>,
    quote: Arc<SimpleQuote>,
    forwarding: Handle<dyn YieldTermStructure>,
    index: Arc<IborIndex>,
}

fn market(rate: f64) -> Market {
    let settings = Arc::new(Settings::new(d(2024, 2, 1)));
    let quote = Arc::new(SimpleQuote::new(rate));
    let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::fixed(
        d(2024, 2, 1),
        quote.clone(),
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
        CalendarId::Target2,
    ));
    let forwarding = Handle::new(curve, "forwarding curve");
    let index = Arc::new(IborIndex::euribor(
        Period::months(3),
        forwarding.clone(),
        settings.clone(),
    ));
    Market {
        settings,
        quote,
        forwarding,
        index,
    }
}

fn euribor_fra(
    m: &Market,
    position: Position,
    strike: f64,
    use_indexed_coupon: bool,
) -> ForwardRateAgreement {
    ForwardRateAgreement::builder()
        .value_date(d(2024, 3, 4))
        .maturity_date(d(2024, 6, 4))
        .position(position)
        .strike(strike)
        .notional(1_000_000.0)
        .index(m.index.clone())
        .use_indexed_coupon(use_indexed_coupon)
        .settings(m.settings.clone())
        .build()
        .unwrap()
}

fn example_curve() -> Handle<dyn YieldTermStructure> {
    // P(value date) = 0.995 and P(value)/P(maturity) = 1.015
    let curve: Arc<dyn YieldTermStructure> = Arc::new(
        DiscountCurve::builder()
            .pillar(d(2024, 2, 1), 1.0)
            .pillar(d(2024, 3, 1), 0.995)
            .pillar(d(2024, 6, 1), 0.995 / 1.015)
            .day_counter(DayCountConvention::Thirty360US)
            .calendar(CalendarId::Null)
            .build()
            .unwrap(),
    );
    Handle::new(curve, "discount curve")
}

#[test]
fn test_curve_only_worked_example() {
    let settings = Arc::new(Settings::new(d(2024, 2, 1)));
    let fra = ForwardRateAgreement::with_discount_curve(
        d(2024, 3, 1),
        d(2024, 6, 1),
        Position::Long,
        0.05,
        1_000_000.0,
        example_curve(),
        2,
        BusinessDayConvention::Following,
        settings,
    )
    .unwrap();

    // 30/360 from 2024-03-01 to 2024-06-01 is exactly 0.25
    let forward = fra.forward_rate().unwrap();
    assert_relative_eq!(forward.rate(), 0.06, epsilon = 1e-12);
    assert_eq!(forward.day_counter(), DayCountConvention::Thirty360US);
    assert_eq!(forward.compounding(), Compounding::Simple);

    let amount = fra.amount().unwrap();
    assert_relative_eq!(amount, 1_000_000.0 * 0.01 * 0.25 / 1.015, epsilon = 1e-6);
    assert_relative_eq!(amount, 2463.05, epsilon = 0.01);
    assert_relative_eq!(fra.npv().unwrap(), amount * 0.995, epsilon = 1e-6);
    assert!(!fra.is_expired());
}

#[test]
fn test_indexed_coupon_matches_par_on_flat_curve() {
    let m = market(0.035);
    let indexed = euribor_fra(&m, Position::Long, 0.03, true);
    let par = euribor_fra(&m, Position::Long, 0.03, false);

    assert_eq!(indexed.rate_policy(), RatePolicy::IndexedCoupon);
    assert_eq!(par.rate_policy(), RatePolicy::ParApproximation);
    assert_relative_eq!(
        indexed.forward_rate().unwrap().rate(),
        par.forward_rate().unwrap().rate(),
        epsilon = 1e-12
    );
    assert_relative_eq!(indexed.npv().unwrap(), par.npv().unwrap(), epsilon = 1e-6);
}

#[test]
fn test_long_and_short_offset() {
    let m = market(0.035);
    let long = euribor_fra(&m, Position::Long, 0.03, false);
    let short = euribor_fra(&m, Position::Short, 0.03, false);
    assert!(long.amount().unwrap() > 0.0);
    assert_relative_eq!(long.npv().unwrap(), -short.npv().unwrap(), epsilon = 1e-9);
}

#[test]
fn test_idempotent_queries() {
    let m = market(0.035);
    let fra = euribor_fra(&m, Position::Long, 0.03, true);

    let first = (fra.forward_rate().unwrap(), fra.amount().unwrap(), fra.npv().unwrap());
    let second = (fra.forward_rate().unwrap(), fra.amount().unwrap(), fra.npv().unwrap());
    assert_eq!(first, second);
    assert_eq!(fra.calculation_count(), 1);
}

#[test]
fn test_quote_change_propagates() {
    let m = market(0.035);
    let fra = euribor_fra(&m, Position::Long, 0.03, true);
    let base = fra.npv().unwrap();

    m.quote.set_value(0.025);
    let bumped = fra.npv().unwrap();
    assert!(bumped < 0.0);
    assert!(bumped < base);
    assert_eq!(fra.calculation_count(), 2);
}

#[test]
fn test_relinking_forwarding_curve_propagates() {
    let m = market(0.035);
    let fra = euribor_fra(&m, Position::Long, 0.03, false);
    let base = fra.forward_rate().unwrap().rate();

    let higher: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::from_rate(
        d(2024, 2, 1),
        0.05,
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
    ));
    m.forwarding.link_to(higher);
    assert!(fra.forward_rate().unwrap().rate() > base);
}

#[test]
fn test_separate_discount_curve() {
    let m = market(0.035);
    let discount: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::from_rate(
        d(2024, 2, 1),
        0.10,
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
    ));
    let discount = Handle::new(discount, "discount curve");
    let fra = ForwardRateAgreement::with_index(
        d(2024, 3, 4),
        d(2024, 6, 4),
        Position::Long,
        0.03,
        1_000_000.0,
        m.index.clone(),
        discount.clone(),
        false,
        m.settings.clone(),
    )
    .unwrap();
    let reference = euribor_fra(&m, Position::Long, 0.03, false);

    // Same forward, heavier discounting
    assert_eq!(
        fra.forward_rate().unwrap().rate(),
        reference.forward_rate().unwrap().rate()
    );
    assert_eq!(fra.amount().unwrap(), reference.amount().unwrap());
    let df = (-0.10_f64 * 32.0 / 365.0).exp();
    assert_relative_eq!(fra.npv().unwrap(), fra.amount().unwrap() * df, epsilon = 1e-9);

    // An unlinked discount handle falls back to the forwarding curve
    discount.unlink();
    assert_relative_eq!(fra.npv().unwrap(), reference.npv().unwrap(), epsilon = 1e-9);
}

#[test]
fn test_discount_curve_quote_change_reprices() {
    let m = market(0.035);
    let discount_quote = Arc::new(SimpleQuote::new(0.10));
    let discount: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::fixed(
        d(2024, 2, 1),
        discount_quote.clone(),
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
        CalendarId::Target2,
    ));
    let fra = ForwardRateAgreement::with_index(
        d(2024, 3, 4),
        d(2024, 6, 4),
        Position::Long,
        0.03,
        1_000_000.0,
        m.index.clone(),
        Handle::new(discount, "discount curve"),
        false,
        m.settings.clone(),
    )
    .unwrap();
    let amount = fra.amount().unwrap();
    assert_eq!(fra.calculation_count(), 1);

    discount_quote.set_value(0.12);
    assert!(!fra.is_calculated());
    assert_eq!(fra.amount().unwrap(), amount);
    let df = (-0.12_f64 * 32.0 / 365.0).exp();
    assert_relative_eq!(fra.npv().unwrap(), amount * df, epsilon = 1e-9);
    assert_eq!(fra.calculation_count(), 2);
}

#[test]
fn test_curve_only_quote_change_reprices() {
    let settings = Arc::new(Settings::new(d(2024, 2, 1)));
    let quote = Arc::new(SimpleQuote::new(0.04));
    let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::fixed(
        d(2024, 2, 1),
        quote.clone(),
        DayCountConvention::Act365Fixed,
        Compounding::Continuous,
        CalendarId::Null,
    ));
    let fra = ForwardRateAgreement::with_discount_curve(
        d(2024, 3, 1),
        d(2024, 6, 1),
        Position::Long,
        0.04,
        1_000_000.0,
        Handle::new(curve, "discount curve"),
        2,
        BusinessDayConvention::Following,
        settings,
    )
    .unwrap();
    let base_forward = fra.forward_rate().unwrap().rate();
    let base_amount = fra.amount().unwrap();

    quote.set_value(0.05);
    let tau = 92.0 / 365.0;
    let forward = fra.forward_rate().unwrap().rate();
    assert!(forward > base_forward);
    assert_relative_eq!(forward, ((0.05_f64 * tau).exp() - 1.0) / tau, epsilon = 1e-12);
    assert!(fra.amount().unwrap() > base_amount);
    let df = (-0.05_f64 * 29.0 / 365.0).exp();
    assert_relative_eq!(fra.npv().unwrap(), fra.amount().unwrap() * df, epsilon = 1e-9);
    assert_eq!(fra.calculation_count(), 2);
}

#[test]
fn test_evaluation_date_drives_expiry() {
    let m = market(0.035);
    let fra = euribor_fra(&m, Position::Long, 0.03, false);
    assert!(!fra.is_expired());
    let live = fra.npv().unwrap();
    assert!(live > 0.0);

    m.settings.set_evaluation_date(d(2024, 3, 8));
    assert!(fra.is_expired());
    assert!(fra.forward_rate().is_ok());
    assert_eq!(fra.amount().unwrap(), 0.0);
    assert_eq!(fra.npv().unwrap(), 0.0);

    // Moving back un-expires the contract
    m.settings.set_evaluation_date(d(2024, 2, 1));
    assert!(!fra.is_expired());
    assert_relative_eq!(fra.npv().unwrap(), live, epsilon = 1e-9);
}

#[test]
fn test_expired_indexed_coupon_uses_stored_fixing() {
    let m = market(0.035);
    let fra = euribor_fra(&m, Position::Long, 0.03, true);
    m.settings.set_evaluation_date(d(2024, 3, 8));

    // Past fixing without history is a collaborator failure
    assert!(matches!(
        fra.forward_rate(),
        Err(InstrumentError::Curve(CurveError::MissingFixing { .. }))
    ));

    m.index.add_fixing(d(2024, 2, 29), 0.0391, false).unwrap();
    let forward = fra.forward_rate().unwrap();
    assert_eq!(forward.rate(), 0.0391);
    assert_eq!(forward.day_counter(), DayCountConvention::Act360);
}

#[test]
fn test_construction_validation() {
    let m = market(0.035);
    let zero = ForwardRateAgreement::builder()
        .value_date(d(2024, 3, 4))
        .maturity_date(d(2024, 6, 4))
        .strike(0.03)
        .notional(0.0)
        .index(m.index.clone())
        .settings(m.settings.clone())
        .build();
    assert!(matches!(zero, Err(InstrumentError::InvalidNotional { .. })));

    let inverted = ForwardRateAgreement::builder()
        .value_date(d(2024, 6, 4))
        .maturity_date(d(2024, 3, 4))
        .strike(0.03)
        .notional(1_000_000.0)
        .index(m.index.clone())
        .settings(m.settings.clone())
        .build();
    assert!(matches!(inverted, Err(InstrumentError::InvalidDates { .. })));

    let same_day = ForwardRateAgreement::with_discount_curve(
        d(2024, 3, 1),
        d(2024, 3, 1),
        Position::Long,
        0.05,
        1_000_000.0,
        example_curve(),
        2,
        BusinessDayConvention::Following,
        m.settings.clone(),
    );
    assert!(matches!(same_day, Err(InstrumentError::InvalidDates { .. })));
}

proptest! {
    #[test]
    fn prop_amount_sign_follows_rate_spread(
        rate in 0.001f64..0.08,
        strike in 0.0f64..0.08,
        short in any::<bool>(),
    ) {
        let m = market(rate);
        let position = if short { Position::Short } else { Position::Long };
        let fra = euribor_fra(&m, position, strike, false);

        let forward = fra.forward_rate().unwrap().rate();
        let amount = fra.amount().unwrap();
        let expected = position.sign() * (forward - strike);
        prop_assume!(expected.abs() > 1e-12);
        prop_assert_eq!(amount.signum(), expected.signum());
        prop_assert_eq!(fra.npv().unwrap().signum(), expected.signum());
    }

    #[test]
    fn prop_repeated_queries_are_cached(rate in 0.0f64..0.08, queries in 1usize..10) {
        let m = market(rate);
        let fra = euribor_fra(&m, Position::Long, 0.02, true);
        let first = fra.npv().unwrap();
        for _ in 0..queries {
            prop_assert_eq!(fra.npv().unwrap(), first);
        }
        prop_assert_eq!(fra.calculation_count(), 1);
    }
}
