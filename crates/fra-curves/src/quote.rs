//! Observable market quotes.

use fra_core::patterns::{Observable, Subject};
use parking_lot::RwLock;
use std::fmt;
use tracing::trace;

use crate::error::{CurveError, CurveResult};

/// A single observable number, such as a flat rate or a deposit quote.
///
/// Setting a different value notifies observers; setting the same value
/// is a no-op.
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observable: Observable,
}

impl SimpleQuote {
    /// Creates a quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observable: Observable::new(),
        }
    }

    /// Creates a quote with no value.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            value: RwLock::new(None),
            observable: Observable::new(),
        }
    }

    /// Current value.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidValue` if the quote has no value.
    pub fn value(&self) -> CurveResult<f64> {
        (*self.value.read()).ok_or_else(|| CurveError::invalid_value("quote", "no value set"))
    }

    /// Returns true if the quote holds a value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.value.read().is_some()
    }

    /// Sets a new value and returns the change from the previous one.
    pub fn set_value(&self, value: f64) -> f64 {
        let previous = self.value.write().replace(value);
        let diff = previous.map_or(value, |p| value - p);
        if previous != Some(value) {
            trace!(value, "quote changed");
            self.observable.notify_observers();
        }
        diff
    }

    /// Clears the value and notifies observers.
    pub fn reset(&self) {
        if self.value.write().take().is_some() {
            self.observable.notify_observers();
        }
    }
}

impl Subject for SimpleQuote {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("value", &*self.value.read())
            .finish()
    }
}
