//! # FRA Core
//!
//! Core types and reactive plumbing for forward rate agreement valuation.
//!
//! This crate provides the foundational building blocks used by the other
//! `fra-*` crates:
//!
//! - **Types**: `Date` and `Period`
//! - **Day Count Conventions**: ACT/360, ACT/365F, ACT/ACT ISDA, 30/360 US
//! - **Business Day Calendars**: Null, weekend-only and TARGET2 calendars
//! - **Patterns**: Observer/subject notification graph and lazy caches
//! - **Settings**: The observable evaluation date
//! - **Handles**: Shared, relinkable links to observable market data
//!
//! ## Example
//!
//! ```rust
//! use fra_core::prelude::*;
//!
//! let cal = Target2Calendar;
//! let value_date = Date::from_ymd(2024, 3, 4).unwrap();
//! let fixing = cal
//!     .advance_days(value_date, -2, BusinessDayConvention::Following)
//!     .unwrap();
//! assert_eq!(fixing, Date::from_ymd(2024, 2, 29).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod handle;
pub mod patterns;
pub mod settings;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, CalendarId, NullCalendar, Target2Calendar,
        WeekendCalendar,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::handle::Handle;
    pub use crate::patterns::{CacheState, LazyCache, Observable, Observer, Subject};
    pub use crate::settings::Settings;
    pub use crate::types::{Date, Period, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use handle::Handle;
pub use settings::Settings;
pub use types::{Date, Period, TimeUnit};
