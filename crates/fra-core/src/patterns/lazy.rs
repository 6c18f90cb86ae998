//! Lazily recomputed values driven by the notification graph.
//!
//! A [`LazyCache`] holds one of two states, [`CacheState::Stale`] or
//! [`CacheState::Fresh`]. Notifications from observed subjects switch it to
//! `Stale` immediately; the value is only recomputed on the next read.
//!
//! Every notification bumps a revision counter. A computation that started
//! under an older revision is returned to its caller but not cached, so a
//! notification that arrives while computing can never be lost.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use super::observable::{Observable, Observer, Subject, Subscription};

/// The two states of a cached value.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState<T> {
    /// Must be recomputed before use.
    Stale,
    /// Valid until the next notification.
    Fresh(T),
}

impl<T> CacheState<T> {
    /// Returns true for `Fresh`.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheState::Fresh(_))
    }

    /// Returns the cached value, if fresh.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            CacheState::Fresh(value) => Some(value),
            CacheState::Stale => None,
        }
    }
}

struct CacheCell<T> {
    label: &'static str,
    state: Mutex<CacheState<T>>,
    revision: AtomicU64,
    frozen: AtomicBool,
    calculations: AtomicU64,
    observable: Arc<Observable>,
}

impl<T> CacheCell<T> {
    fn mark_stale(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
        let was_fresh = {
            let mut state = self.state.lock();
            let was_fresh = state.is_fresh();
            *state = CacheState::Stale;
            was_fresh
        };
        if was_fresh {
            trace!(cache = self.label, "invalidated");
            self.observable.notify_observers();
        }
    }
}

impl<T: Send + Sync> Observer for CacheCell<T> {
    fn update(&self) {
        if self.frozen.load(Ordering::SeqCst) {
            trace!(cache = self.label, "frozen, notification ignored");
            return;
        }
        self.mark_stale();
    }
}

/// A cached value recomputed on demand after any upstream change.
///
/// The cache is itself a [`Subject`]: it notifies its own observers when a
/// fresh value becomes stale.
///
/// # Example
///
/// ```rust
/// use fra_core::patterns::{LazyCache, Observable, Subject};
/// use std::sync::Arc;
///
/// struct Source(Observable);
/// impl Subject for Source {
///     fn observable(&self) -> &Observable { &self.0 }
/// }
///
/// let source = Arc::new(Source(Observable::new()));
/// let cache: LazyCache<f64> = LazyCache::new("example");
/// cache.observe(source.clone());
///
/// let v: Result<f64, ()> = cache.get_or_compute(|| Ok(42.0));
/// assert_eq!(v, Ok(42.0));
/// assert!(cache.is_fresh());
///
/// source.observable().notify_observers();
/// assert!(!cache.is_fresh());
/// ```
pub struct LazyCache<T> {
    cell: Arc<CacheCell<T>>,
    subscription: Mutex<Subscription>,
}

impl<T: Clone + Send + Sync + 'static> LazyCache<T> {
    /// Creates a stale cache. `label` identifies it in trace output.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        let cell = Arc::new(CacheCell {
            label,
            state: Mutex::new(CacheState::Stale),
            revision: AtomicU64::new(0),
            frozen: AtomicBool::new(false),
            calculations: AtomicU64::new(0),
            observable: Observable::shared(),
        });
        let observer: Arc<dyn Observer> = cell.clone();
        Self {
            cell,
            subscription: Mutex::new(Subscription::new(observer)),
        }
    }

    /// Subscribes the cache to a subject.
    pub fn observe(&self, subject: Arc<dyn Subject>) {
        self.subscription.lock().observe(subject);
    }

    /// Returns the cached value, computing it first if stale.
    ///
    /// A failed computation leaves the cache stale and returns the error.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns.
    pub fn get_or_compute<E, F>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let CacheState::Fresh(value) = &*self.cell.state.lock() {
            trace!(cache = self.cell.label, "cache hit");
            return Ok(value.clone());
        }

        let revision = self.cell.revision.load(Ordering::SeqCst);
        let count = self.cell.calculations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(cache = self.cell.label, revision, calculation = count, "recomputing");

        let value = compute()?;

        let mut state = self.cell.state.lock();
        if self.cell.revision.load(Ordering::SeqCst) == revision {
            *state = CacheState::Fresh(value.clone());
        } else {
            debug!(
                cache = self.cell.label,
                "invalidated during computation, result not cached"
            );
        }
        Ok(value)
    }

    /// Forces a recomputation, even when frozen, and notifies observers.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns; the cache is left stale.
    pub fn recalculate<E, F>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.revision.fetch_add(1, Ordering::SeqCst);
        *self.cell.state.lock() = CacheState::Stale;
        let result = self.get_or_compute(compute);
        self.cell.observable.notify_observers();
        result
    }

    /// Marks the cache stale, as a notification would.
    pub fn invalidate(&self) {
        self.cell.update();
    }

    /// Stops reacting to notifications; the current value is kept.
    pub fn freeze(&self) {
        self.cell.frozen.store(true, Ordering::SeqCst);
    }

    /// Resumes reacting to notifications and invalidates the cache.
    pub fn unfreeze(&self) {
        if self.cell.frozen.swap(false, Ordering::SeqCst) {
            self.cell.mark_stale();
        }
    }

    /// Returns true while frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.cell.frozen.load(Ordering::SeqCst)
    }

    /// Returns true if a valid value is cached.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.cell.state.lock().is_fresh()
    }

    /// Returns a copy of the current state without computing.
    #[must_use]
    pub fn state(&self) -> CacheState<T> {
        self.cell.state.lock().clone()
    }

    /// Number of computations started so far.
    #[must_use]
    pub fn calculation_count(&self) -> u64 {
        self.cell.calculations.load(Ordering::SeqCst)
    }

    /// Number of invalidations seen so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.cell.revision.load(Ordering::SeqCst)
    }
}

impl<T> Subject for LazyCache<T>
where
    T: Send + Sync,
{
    fn observable(&self) -> &Observable {
        &self.cell.observable
    }
}

impl<T> fmt::Debug for LazyCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("label", &self.cell.label)
            .field("fresh", &self.cell.state.lock().is_fresh())
            .field("revision", &self.cell.revision.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Source(Observable);

    impl Subject for Source {
        fn observable(&self) -> &Observable {
            &self.0
        }
    }

    impl Source {
        fn fire(&self) {
            self.0.notify_observers();
        }
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Observer for Counter {
        fn update(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ok(v: f64) -> Result<f64, String> {
        Ok(v)
    }

    #[test]
    fn test_starts_stale_and_caches() {
        let cache: LazyCache<f64> = LazyCache::new("test");
        assert!(!cache.is_fresh());

        assert_eq!(cache.get_or_compute(|| ok(1.0)), Ok(1.0));
        assert_eq!(cache.get_or_compute(|| ok(2.0)), Ok(1.0));
        assert_eq!(cache.calculation_count(), 1);
        assert_eq!(cache.state(), CacheState::Fresh(1.0));
    }

    #[test]
    fn test_notification_invalidates() {
        let source = Arc::new(Source::default());
        let cache: LazyCache<f64> = LazyCache::new("test");
        cache.observe(source.clone());

        cache.get_or_compute(|| ok(1.0)).unwrap();
        source.fire();
        assert!(!cache.is_fresh());
        assert_eq!(cache.get_or_compute(|| ok(2.0)), Ok(2.0));
        assert_eq!(cache.calculation_count(), 2);
    }

    #[test]
    fn test_error_leaves_stale() {
        let cache: LazyCache<f64> = LazyCache::new("test");
        let err: Result<f64, String> = cache.get_or_compute(|| Err("boom".to_string()));
        assert!(err.is_err());
        assert!(!cache.is_fresh());
        assert_eq!(cache.get_or_compute(|| ok(3.0)), Ok(3.0));
    }

    #[test]
    fn test_notification_during_compute_is_not_lost() {
        let source = Arc::new(Source::default());
        let cache: LazyCache<f64> = LazyCache::new("test");
        cache.observe(source.clone());

        let value = cache.get_or_compute(|| {
            source.fire();
            ok(1.0)
        });
        assert_eq!(value, Ok(1.0));
        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_freeze_and_unfreeze() {
        let source = Arc::new(Source::default());
        let cache: LazyCache<f64> = LazyCache::new("test");
        cache.observe(source.clone());

        cache.get_or_compute(|| ok(1.0)).unwrap();
        cache.freeze();
        source.fire();
        assert!(cache.is_fresh());
        assert_eq!(cache.get_or_compute(|| ok(2.0)), Ok(1.0));

        cache.unfreeze();
        assert!(!cache.is_frozen());
        assert_eq!(cache.get_or_compute(|| ok(2.0)), Ok(2.0));
    }

    #[test]
    fn test_recalculate_forces() {
        let cache: LazyCache<f64> = LazyCache::new("test");
        cache.get_or_compute(|| ok(1.0)).unwrap();
        cache.freeze();
        assert_eq!(cache.recalculate(|| ok(5.0)), Ok(5.0));
        assert_eq!(cache.calculation_count(), 2);
        assert_eq!(cache.get_or_compute(|| ok(9.0)), Ok(5.0));
    }

    #[test]
    fn test_forwards_only_on_fresh_to_stale() {
        let source = Arc::new(Source::default());
        let cache: LazyCache<f64> = LazyCache::new("test");
        cache.observe(source.clone());

        let counter = Arc::new(Counter::default());
        let obs: Arc<dyn Observer> = counter.clone();
        cache.register_observer(&obs);

        // Stale -> Stale does not forward
        source.fire();
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        cache.get_or_compute(|| ok(1.0)).unwrap();
        source.fire();
        source.fire();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unregisters() {
        let source = Arc::new(Source::default());
        {
            let cache: LazyCache<f64> = LazyCache::new("test");
            cache.observe(source.clone());
            assert_eq!(source.observable().observer_count(), 1);
        }
        assert_eq!(source.observable().observer_count(), 0);
    }
}
