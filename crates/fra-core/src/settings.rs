//! Evaluation settings: the observable "today" of a valuation context.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::patterns::{Observable, Subject};
use crate::types::Date;

static GLOBAL: Lazy<Arc<Settings>> = Lazy::new(|| Arc::new(Settings::floating()));

/// Evaluation date and event conventions shared by a valuation context.
///
/// Settings are a subject: changing the evaluation date notifies every
/// curve, index and instrument that depends on it.
///
/// Most applications use [`Settings::global`]. Tests and what-if scenarios
/// that must not disturb other contexts create their own with
/// [`Settings::new`].
#[derive(Debug)]
pub struct Settings {
    evaluation_date: RwLock<Option<Date>>,
    include_reference_date_events: AtomicBool,
    observable: Observable,
}

impl Settings {
    /// Creates settings pinned to the given evaluation date.
    #[must_use]
    pub fn new(evaluation_date: Date) -> Self {
        Self {
            evaluation_date: RwLock::new(Some(evaluation_date)),
            include_reference_date_events: AtomicBool::new(false),
            observable: Observable::new(),
        }
    }

    /// Creates settings whose evaluation date follows the system clock.
    #[must_use]
    pub fn floating() -> Self {
        Self {
            evaluation_date: RwLock::new(None),
            include_reference_date_events: AtomicBool::new(false),
            observable: Observable::new(),
        }
    }

    /// The process-wide default settings.
    #[must_use]
    pub fn global() -> Arc<Settings> {
        Arc::clone(&GLOBAL)
    }

    /// Current evaluation date (today unless one was set).
    #[must_use]
    pub fn evaluation_date(&self) -> Date {
        (*self.evaluation_date.read()).unwrap_or_else(Date::today)
    }

    /// Sets the evaluation date and notifies observers.
    ///
    /// Observers are notified even if the date is unchanged.
    pub fn set_evaluation_date(&self, date: Date) {
        *self.evaluation_date.write() = Some(date);
        debug!(%date, "evaluation date set");
        self.observable.notify_observers();
    }

    /// Returns to following the system clock and notifies observers.
    pub fn reset_evaluation_date(&self) {
        *self.evaluation_date.write() = None;
        debug!("evaluation date reset to today");
        self.observable.notify_observers();
    }

    /// Whether events falling on the evaluation date count as not yet occurred.
    #[must_use]
    pub fn include_reference_date_events(&self) -> bool {
        self.include_reference_date_events.load(Ordering::SeqCst)
    }

    /// Changes the reference-date event rule; notifies observers on change.
    pub fn set_include_reference_date_events(&self, include: bool) {
        let previous = self
            .include_reference_date_events
            .swap(include, Ordering::SeqCst);
        if previous != include {
            self.observable.notify_observers();
        }
    }

    /// Whether an event on `date` has already happened.
    ///
    /// Events strictly before the evaluation date have occurred. An event on
    /// the evaluation date itself has occurred unless reference-date events
    /// are included.
    #[must_use]
    pub fn has_occurred(&self, date: Date) -> bool {
        let today = self.evaluation_date();
        if self.include_reference_date_events() {
            date < today
        } else {
            date <= today
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::floating()
    }
}

impl Subject for Settings {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}
