//! # trickle-claim: one-shot claim controllers.
//!
//! Any account may claim once. Two controllers share the same skeleton
//! (direct-caller restriction, start time, one claim per account, hard cap):
//! - [`ClaimController`] sizes each claim with the decay engine so that
//!   issuance tracks a linear target schedule.
//! - [`FlatClaimController`] mints a fixed amount per claim.
//!
//! Each controller serialises claims behind a single lock covering both the
//! claim bookkeeping and the ledger.

pub mod controller;
pub mod flat;
pub mod state;

pub use controller::{ClaimController, ClaimQuote};
pub use flat::{FlatClaimController, FlatConfig, FlatParams};
pub use state::{ClaimReceipt, ClaimState};
