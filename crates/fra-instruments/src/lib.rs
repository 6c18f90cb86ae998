//! # FRA Instruments
//!
//! Forward rate agreements valued lazily on observable market data.
//!
//! A [`ForwardRateAgreement`] subscribes to the evaluation date, its
//! discount curve handle and its index. Any notification marks its cached
//! results stale; the next query recomputes them. The forward rate comes
//! from one of three [`RatePolicy`] variants fixed at construction:
//!
//! - **IndexedCoupon**: the index fixing for the contract's fixing date
//! - **ParApproximation**: the par rate of the index forwarding curve
//! - **CurveOnly**: the par rate of the discount curve, without an index
//!
//! ## Quick Start
//!
//! ```rust
//! use fra_core::prelude::*;
//! use fra_curves::prelude::*;
//! use fra_instruments::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = Arc::new(Settings::new(Date::from_ymd(2024, 2, 1).unwrap()));
//! let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::from_rate(
//!     Date::from_ymd(2024, 2, 1).unwrap(),
//!     0.035,
//!     DayCountConvention::Act365Fixed,
//!     Compounding::Continuous,
//! ));
//! let index = Arc::new(IborIndex::euribor(
//!     Period::months(3),
//!     Handle::new(curve, "forwarding curve"),
//!     settings.clone(),
//! ));
//!
//! let fra = ForwardRateAgreement::builder()
//!     .value_date(Date::from_ymd(2024, 3, 4).unwrap())
//!     .strike(0.03)
//!     .notional(10_000_000.0)
//!     .index(index)
//!     .settings(settings)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fra.rate_policy(), RatePolicy::ParApproximation);
//! assert!(fra.npv().unwrap() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod fra;
pub mod instrument;
pub mod position;

pub use error::{InstrumentError, InstrumentResult};
pub use fra::{ForwardRateAgreement, ForwardRateAgreementBuilder, FraResults, RatePolicy};
pub use instrument::Instrument;
pub use position::Position;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{InstrumentError, InstrumentResult};
    pub use crate::fra::{ForwardRateAgreement, ForwardRateAgreementBuilder, FraResults, RatePolicy};
    pub use crate::instrument::Instrument;
    pub use crate::position::Position;
}
