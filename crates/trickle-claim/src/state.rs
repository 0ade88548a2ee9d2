//! Mutable claim bookkeeping.
//!
//! [`ClaimState`] owns the ledger together with the cumulative issuance
//! counter and the set of accounts that have claimed. Controllers keep it
//! behind one lock, so checking "already claimed", marking, and minting
//! cannot be separated.

use std::collections::HashSet;

use serde::Serialize;
use trickle_core::error::{ClaimError, MathError};
use trickle_core::traits::Ledger;
use trickle_core::types::AccountId;
use trickle_core::U256;

/// Outcome of a successful claim call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    /// Account credited by the claim.
    pub account: AccountId,
    /// Base units minted. Zero only for a degenerate configuration, in
    /// which case the account is not marked as claimed.
    pub amount: u128,
    /// Wad multiplier applied to the per-step baseline. `1e18` for flat claims.
    pub quotient: U256,
    /// Cumulative issuance after this claim.
    pub cumulative_issued: u128,
    /// Host time of the claim.
    pub timestamp: u64,
}

/// Cumulative issuance, claimed accounts, and the ledger they mint into.
#[derive(Debug)]
pub struct ClaimState<L> {
    ledger: L,
    cumulative_issued: u128,
    claimed: HashSet<AccountId>,
}

impl<L: Ledger> ClaimState<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            cumulative_issued: 0,
            claimed: HashSet::new(),
        }
    }

    pub fn cumulative_issued(&self) -> u128 {
        self.cumulative_issued
    }

    pub fn has_claimed(&self, account: &AccountId) -> bool {
        self.claimed.contains(account)
    }

    /// Number of accounts that have claimed.
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Mark `account` as claimed and mint `amount` to it.
    ///
    /// Returns the new cumulative issuance. On any error the state is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::AlreadyClaimed`] if `account` is already marked
    /// - [`ClaimError::Math`] if cumulative issuance would overflow
    /// - [`ClaimError::Ledger`] if the ledger rejects the mint
    pub fn settle(&mut self, account: AccountId, amount: u128) -> Result<u128, ClaimError> {
        let next = self
            .cumulative_issued
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;

        if !self.claimed.insert(account) {
            return Err(ClaimError::AlreadyClaimed(account));
        }
        if let Err(e) = self.ledger.mint(&account, amount) {
            self.claimed.remove(&account);
            return Err(e.into());
        }

        self.cumulative_issued = next;
        Ok(next)
    }
}
