//! Domain types shared by every layer.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Period`]: Signed calendar period such as an index tenor

mod date;
mod period;

pub use date::Date;
pub use period::{Period, TimeUnit};
