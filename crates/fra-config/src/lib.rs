//! FRA Configuration Layer
//!
//! Serde model of market files: an evaluation date, named curves, Ibor
//! indices with their fixing history, and the FRAs to value. Files are
//! written in TOML or JSON and checked with the [`Validate`] trait before
//! use.
//!
//! # Example
//!
//! ```rust
//! use fra_config::{from_toml_str, Validate};
//!
//! let market = from_toml_str(r#"
//!     evaluation_date = "2024-02-01"
//!
//!     [[curves]]
//!     type = "flat"
//!     name = "ESTR"
//!     rate = 0.035
//!
//!     [[indices]]
//!     name = "EUR3M"
//!     tenor = "3M"
//!     forwarding_curve = "ESTR"
//!
//!     [[fras]]
//!     id = "FRA-1"
//!     value_date = "2024-03-04"
//!     strike = 0.03
//!     notional = 1000000.0
//!     index = "EUR3M"
//! "#).unwrap();
//!
//! assert!(market.is_valid());
//! assert_eq!(market.fras[0].fixing_days, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod loader;
pub mod market;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{from_json_str, from_toml_str, load};
pub use market::{
    CurveConfig, DiscountCurveConfig, FixingConfig, FlatCurveConfig, FraConfig, IndexConfig,
    MarketFile, PillarConfig,
};
