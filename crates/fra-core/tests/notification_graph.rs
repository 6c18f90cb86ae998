//! End-to-end behaviour of settings, handles and lazy caches wired together.

use std::sync::Arc;

use fra_core::prelude::*;
use proptest::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

#[test]
fn evaluation_date_change_reaches_cache_through_handle() {
    let settings = Arc::new(Settings::new(d(2024, 2, 1)));
    let handle = Handle::new(settings.clone(), "settings");

    let cache: LazyCache<Date> = LazyCache::new("eval-date");
    cache.observe(Arc::new(handle.clone()));

    let read = |h: &Handle<Settings>| -> CoreResult<Date> {
        Ok(h.current_link()?.evaluation_date())
    };

    assert_eq!(cache.get_or_compute(|| read(&handle)).unwrap(), d(2024, 2, 1));
    assert_eq!(cache.calculation_count(), 1);

    settings.set_evaluation_date(d(2024, 2, 2));
    assert!(!cache.is_fresh());
    assert_eq!(cache.get_or_compute(|| read(&handle)).unwrap(), d(2024, 2, 2));
    assert_eq!(cache.calculation_count(), 2);
}

#[test]
fn relinking_handle_invalidates_cache() {
    let first = Arc::new(Settings::new(d(2024, 1, 1)));
    let second = Arc::new(Settings::new(d(2025, 1, 1)));
    let handle = Handle::new(first, "settings");

    let cache: LazyCache<Date> = LazyCache::new("eval-date");
    cache.observe(Arc::new(handle.clone()));
    let h = handle.clone();
    cache
        .get_or_compute(|| -> CoreResult<Date> { Ok(h.current_link()?.evaluation_date()) })
        .unwrap();

    handle.link_to(second);
    let value = cache
        .get_or_compute(|| -> CoreResult<Date> { Ok(h.current_link()?.evaluation_date()) })
        .unwrap();
    assert_eq!(value, d(2025, 1, 1));
}

#[test]
fn empty_handle_error_leaves_cache_stale() {
    let handle: Handle<Settings> = Handle::empty("settings");
    let cache: LazyCache<Date> = LazyCache::new("eval-date");
    cache.observe(Arc::new(handle.clone()));

    let result = cache.get_or_compute(|| -> CoreResult<Date> {
        Ok(handle.current_link()?.evaluation_date())
    });
    assert!(matches!(result, Err(CoreError::EmptyHandle { .. })));
    assert!(!cache.is_fresh());

    handle.link_to(Arc::new(Settings::new(d(2024, 6, 3))));
    let value = cache
        .get_or_compute(|| -> CoreResult<Date> { Ok(handle.current_link()?.evaluation_date()) })
        .unwrap();
    assert_eq!(value, d(2024, 6, 3));
}

#[test]
fn chained_caches_propagate_invalidation() {
    let settings = Arc::new(Settings::new(d(2024, 2, 1)));

    let inner: Arc<LazyCache<i64>> = Arc::new(LazyCache::new("inner"));
    inner.observe(settings.clone());

    let outer: LazyCache<i64> = LazyCache::new("outer");
    outer.observe(inner.clone());

    let s = settings.clone();
    let inner_value = || -> CoreResult<i64> {
        let s = s.clone();
        inner.get_or_compute(move || Ok(i64::from(s.evaluation_date().day())))
    };

    assert_eq!(outer.get_or_compute(&inner_value).unwrap(), 1);
    settings.set_evaluation_date(d(2024, 2, 9));
    assert!(!inner.is_fresh());
    assert!(!outer.is_fresh());
    assert_eq!(outer.get_or_compute(&inner_value).unwrap(), 9);
}

proptest! {
    #[test]
    fn adjusted_dates_are_business_days(offset in 0i64..3650) {
        let cal = Target2Calendar;
        let date = d(2020, 1, 1).add_days(offset);
        for bdc in [
            BusinessDayConvention::Following,
            BusinessDayConvention::ModifiedFollowing,
            BusinessDayConvention::Preceding,
            BusinessDayConvention::ModifiedPreceding,
            BusinessDayConvention::Nearest,
        ] {
            prop_assert!(cal.is_business_day(cal.adjust(date, bdc)));
        }
    }

    #[test]
    fn modified_following_stays_in_month(offset in 0i64..3650) {
        let cal = Target2Calendar;
        let date = d(2020, 1, 1).add_days(offset);
        let adjusted = cal.adjust(date, BusinessDayConvention::ModifiedFollowing);
        prop_assert_eq!(adjusted.month(), date.month());
    }

    #[test]
    fn business_day_steps_round_trip(offset in 0i64..3650, n in 1i32..10) {
        let cal = Target2Calendar;
        let start = cal.adjust(d(2020, 1, 1).add_days(offset), BusinessDayConvention::Following);
        let forward = cal.advance_days(start, n, BusinessDayConvention::Following).unwrap();
        let back = cal.advance_days(forward, -n, BusinessDayConvention::Following).unwrap();
        prop_assert_eq!(back, start);
        prop_assert_eq!(cal.business_days_between(start, forward), n);
    }
}
