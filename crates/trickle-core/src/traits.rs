//! Trait interfaces for Trickle.
//!
//! These traits define the contracts between crates:
//! - [`Ledger`]: fungible-asset storage and minting (host supplies; the
//!   in-memory [`MemoryLedger`](crate::ledger::MemoryLedger) is the reference)
//! - [`IssuanceSchedule`]: ideal emission curve (trickle-decay implements)

use crate::error::{LedgerError, MathError};
use crate::types::AccountId;

/// Balance and supply storage for the distributed asset.
///
/// Trickle only ever mints; transfers and burns belong to the host.
pub trait Ledger: Send + Sync {
    /// Credit `amount` new base units to `to`, increasing total supply.
    ///
    /// Must either apply fully or leave the ledger unchanged.
    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Total base units in existence.
    fn total_supply(&self) -> u128;

    /// Base units held by `account`. Zero for unknown accounts.
    fn balance_of(&self, account: &AccountId) -> u128;
}

/// Target emission curve used by the decay engine.
///
/// Maps a cumulative issuance count to the ideal time at which that count
/// should be reached.
pub trait IssuanceSchedule: Send + Sync {
    /// Ideal time, in wad time units since start, at which the `sold`-th
    /// base unit should be issued.
    fn target_time_units(&self, sold: u128) -> Result<i128, MathError>;
}
