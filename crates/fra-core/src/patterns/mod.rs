//! Change notification and lazy recomputation.
//!
//! - [`observable`]: subjects, observers, relays and subscriptions
//! - [`lazy`]: a two-state cache invalidated by notifications

pub mod lazy;
pub mod observable;

pub use lazy::{CacheState, LazyCache};
pub use observable::{Observable, Observer, Relay, Subject, Subscription};
