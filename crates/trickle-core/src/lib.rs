//! # trickle-core
//! Foundation types, traits, and fixed-point arithmetic for Trickle.

pub mod constants;
pub mod error;
pub mod ledger;
pub mod params;
pub mod traits;
pub mod types;
pub mod wad;

pub use primitive_types::U256;
