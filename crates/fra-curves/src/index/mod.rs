//! Interest rate indices.

mod ibor;

pub use ibor::{IborConventions, IborIndex};
