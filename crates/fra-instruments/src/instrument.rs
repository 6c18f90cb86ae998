//! The instrument abstraction.

use fra_core::patterns::Subject;

use crate::error::InstrumentResult;

/// A lazily valued financial instrument.
///
/// Instruments observe their market data and are themselves subjects:
/// observers are told when a previously computed value goes stale.
pub trait Instrument: Subject {
    /// Whether the instrument has expired as of the evaluation date.
    fn is_expired(&self) -> bool;

    /// Present value, computed on demand and cached.
    fn npv(&self) -> InstrumentResult<f64>;

    /// Forces a full recomputation and notifies observers.
    fn recalculate(&self) -> InstrumentResult<()>;

    /// Stops reacting to market data changes, keeping the current results.
    fn freeze(&self);

    /// Resumes reacting to market data changes and marks results stale.
    fn unfreeze(&self);
}
