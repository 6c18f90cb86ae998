//! # FRA Curves
//!
//! Market data objects for forward rate agreement valuation.
//!
//! This crate provides:
//!
//! - **Quotes**: [`SimpleQuote`], an observable market value
//! - **Compounding**: [`Compounding`] rules and [`InterestRate`] with its basis
//! - **Term Structures**: The [`YieldTermStructure`] trait plus [`FlatForward`]
//!   and log-linear [`DiscountCurve`]
//! - **Indices**: [`IborIndex`] with fixing history and forecasting
//!
//! Every object here is a subject in the `fra_core` notification graph, so
//! dependents learn about quote moves, relinked curves, new fixings and
//! evaluation date changes.
//!
//! ## Quick Start
//!
//! ```rust
//! use fra_core::prelude::*;
//! use fra_curves::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = Arc::new(Settings::new(Date::from_ymd(2024, 2, 1).unwrap()));
//! let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::from_rate(
//!     Date::from_ymd(2024, 2, 1).unwrap(),
//!     0.04,
//!     DayCountConvention::Act365Fixed,
//!     Compounding::Continuous,
//! ));
//! let index = IborIndex::euribor(Period::months(3), Handle::new(curve, "forwarding"), settings);
//!
//! let fixing = index.fixing(Date::from_ymd(2024, 2, 29).unwrap()).unwrap();
//! assert!(fixing > 0.04);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod compounding;
pub mod curves;
pub mod error;
pub mod index;
pub mod quote;
pub mod term_structure;

pub use compounding::{Compounding, InterestRate};
pub use curves::{DiscountCurve, DiscountCurveBuilder, FlatForward};
pub use error::{CurveError, CurveResult};
pub use index::{IborConventions, IborIndex};
pub use quote::SimpleQuote;
pub use term_structure::YieldTermStructure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compounding::{Compounding, InterestRate};
    pub use crate::curves::{DiscountCurve, DiscountCurveBuilder, FlatForward};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::index::{IborConventions, IborIndex};
    pub use crate::quote::SimpleQuote;
    pub use crate::term_structure::YieldTermStructure;
}
