//! Publish/subscribe notification graph.
//!
//! A subject owns an [`Observable`] registry holding *non-owning* references
//! to its observers. Registering never keeps an observer alive; observers
//! that have been dropped are pruned on the next notification.
//!
//! Market data (quotes, curves, indices, the evaluation date) are subjects.
//! Instruments are observers through their lazy cache.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Something that reacts to a change notification.
///
/// `update` must be cheap and must not recompute anything: it only records
/// that dependent state is stale (and may forward the notification).
pub trait Observer: Send + Sync {
    /// Called when a subscribed subject has changed.
    fn update(&self);
}

/// Registry of observers for one subject.
#[derive(Default)]
pub struct Observable {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl Observable {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry behind an `Arc`, ready to be a [`Relay`] target.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Registers an observer. Returns `false` if it was already registered.
    pub fn register(&self, observer: &Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.lock();
        if observers.iter().any(|o| same_observer(o, observer)) {
            return false;
        }
        observers.push(Arc::downgrade(observer));
        true
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, observer: &Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.lock();
        let mut found = false;
        observers.retain(|o| {
            if same_observer(o, observer) {
                found = true;
                false
            } else {
                o.strong_count() > 0
            }
        });
        found
    }

    /// Returns true if the observer is registered.
    #[must_use]
    pub fn is_registered(&self, observer: &Arc<dyn Observer>) -> bool {
        self.observers
            .lock()
            .iter()
            .any(|o| same_observer(o, observer))
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// Notifies every live observer.
    ///
    /// The registry lock is released before any observer runs, so observers
    /// may register or unregister from within `update`.
    pub fn notify_observers(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        trace!(observers = live.len(), "notifying observers");
        for observer in live {
            observer.update();
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn same_observer(weak: &Weak<dyn Observer>, strong: &Arc<dyn Observer>) -> bool {
    std::ptr::eq(
        weak.as_ptr().cast::<()>(),
        Arc::as_ptr(strong).cast::<()>(),
    )
}

/// Anything that can be observed.
pub trait Subject: Send + Sync {
    /// The registry observers subscribe to.
    fn observable(&self) -> &Observable;

    /// Registers an observer with this subject.
    fn register_observer(&self, observer: &Arc<dyn Observer>) -> bool {
        self.observable().register(observer)
    }

    /// Removes an observer from this subject.
    fn unregister_observer(&self, observer: &Arc<dyn Observer>) -> bool {
        self.observable().unregister(observer)
    }
}

/// Observer that re-publishes notifications on another registry.
///
/// Composite subjects (a curve driven by a quote, an index driven by its
/// forwarding curve) own a relay subscribed to their inputs and targeting
/// their own registry. The relay holds its target weakly.
pub struct Relay {
    target: Weak<Observable>,
    label: &'static str,
}

impl Relay {
    /// Creates a relay that forwards to `target`.
    #[must_use]
    pub fn new(target: &Arc<Observable>, label: &'static str) -> Arc<dyn Observer> {
        Arc::new(Self {
            target: Arc::downgrade(target),
            label,
        })
    }
}

impl Observer for Relay {
    fn update(&self) {
        if let Some(target) = self.target.upgrade() {
            trace!(relay = self.label, "forwarding notification");
            target.notify_observers();
        }
    }
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay").field("label", &self.label).finish()
    }
}

/// Keeps an observer registered with a set of subjects.
///
/// The subscription owns the observer and strong references to the
/// subjects; dropping it unregisters the observer from every subject.
pub struct Subscription {
    observer: Arc<dyn Observer>,
    subjects: Vec<Arc<dyn Subject>>,
}

impl Subscription {
    /// Creates a subscription with no subjects yet.
    #[must_use]
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self {
            observer,
            subjects: Vec::new(),
        }
    }

    /// Registers the observer with `subject` and keeps the subject alive.
    pub fn observe(&mut self, subject: Arc<dyn Subject>) {
        if subject.register_observer(&self.observer) {
            self.subjects.push(subject);
        }
    }

    /// Unregisters the observer from every subject.
    pub fn clear(&mut self) {
        for subject in self.subjects.drain(..) {
            subject.unregister_observer(&self.observer);
        }
    }

    /// The subscribed observer.
    #[must_use]
    pub fn observer(&self) -> &Arc<dyn Observer> {
        &self.observer
    }

    /// Number of subjects observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Returns true if no subject is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("subjects", &self.subjects.len())
            .finish()
    }
}
