//! Concrete yield term structures.

mod discount;
mod flat;

pub use discount::{DiscountCurve, DiscountCurveBuilder};
pub use flat::FlatForward;
