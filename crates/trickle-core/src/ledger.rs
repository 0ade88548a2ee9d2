//! In-memory reference ledger.
//!
//! Stores balances in a `HashMap` with no persistence. Hosts with their own
//! asset storage implement [`Ledger`] directly.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::traits::Ledger;
use crate::types::AccountId;

#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: HashMap<AccountId, u128>,
    total_supply: u128,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}

impl Ledger for MemoryLedger {
    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        let current = self.balances.get(to).copied().unwrap_or(0);
        let balance = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(*to))?;

        self.balances.insert(*to, balance);
        self.total_supply = total;
        Ok(())
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}
