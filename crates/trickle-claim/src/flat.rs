//! Fixed-amount claims: every account may claim `claim_amount` once until
//! the cap is reached.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use trickle_core::constants::{DEFAULT_DECIMALS, MAX_DECIMALS, WAD};
use trickle_core::error::{ClaimError, ConfigError};
use trickle_core::traits::Ledger;
use trickle_core::types::{AccountId, CallContext};
use trickle_core::U256;

use crate::state::{ClaimReceipt, ClaimState};

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Raw parameters for a flat distribution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FlatParams {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Hard cap in whole units.
    pub max_supply: u64,
    /// Units minted per claim, in whole units.
    pub claim_amount: u64,
    #[serde(default)]
    pub only_direct_callers: bool,
    pub start_time: u64,
}

/// Validated flat configuration, amounts in base units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatConfig {
    name: String,
    symbol: String,
    decimals: u8,
    max_supply: u128,
    claim_amount: u128,
    only_direct_callers: bool,
    start_time: u64,
}

impl FlatConfig {
    pub fn from_params(params: &FlatParams) -> Result<Self, ConfigError> {
        if params.decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidDecimals {
                got: params.decimals,
                max: MAX_DECIMALS,
            });
        }
        if params.max_supply == 0 {
            return Err(ConfigError::ZeroMaxSupply);
        }
        if params.claim_amount == 0 {
            return Err(ConfigError::ZeroClaimAmount);
        }
        if params.max_supply % params.claim_amount != 0 {
            return Err(ConfigError::UnevenClaimAmount {
                max_supply: params.max_supply as u128,
                claim_amount: params.claim_amount as u128,
            });
        }

        let scale = 10u128.pow(params.decimals as u32);
        let max_supply = (params.max_supply as u128)
            .checked_mul(scale)
            .ok_or(ConfigError::SupplyOverflow)?;
        let claim_amount = (params.claim_amount as u128)
            .checked_mul(scale)
            .ok_or(ConfigError::SupplyOverflow)?;

        Ok(Self {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            decimals: params.decimals,
            max_supply,
            claim_amount,
            only_direct_callers: params.only_direct_callers,
            start_time: params.start_time,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn max_supply(&self) -> u128 {
        self.max_supply
    }

    pub fn claim_amount(&self) -> u128 {
        self.claim_amount
    }

    pub fn only_direct_callers(&self) -> bool {
        self.only_direct_callers
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Number of claims the cap allows.
    pub fn max_claims(&self) -> u128 {
        self.max_supply / self.claim_amount
    }
}

/// Controller minting a fixed amount per claim.
pub struct FlatClaimController<L> {
    config: FlatConfig,
    state: Mutex<ClaimState<L>>,
}

impl<L: Ledger> FlatClaimController<L> {
    pub fn new(config: FlatConfig, ledger: L) -> Self {
        info!(
            name = config.name(),
            symbol = config.symbol(),
            max_supply = config.max_supply(),
            claim_amount = config.claim_amount(),
            start = config.start_time(),
            "created flat distribution"
        );
        Self {
            config,
            state: Mutex::new(ClaimState::new(ledger)),
        }
    }

    pub fn from_params(params: &FlatParams, ledger: L) -> Result<Self, ConfigError> {
        Ok(Self::new(FlatConfig::from_params(params)?, ledger))
    }

    /// Mint `claim_amount` to `ctx.caller`.
    pub fn claim(&self, ctx: &CallContext) -> Result<ClaimReceipt, ClaimError> {
        if self.config.only_direct_callers && !ctx.is_direct() {
            debug!(caller = %ctx.caller, origin = %ctx.origin, "rejected relayed claim");
            return Err(ClaimError::RestrictedCaller);
        }
        if ctx.timestamp < self.config.start_time {
            return Err(ClaimError::ClaimNotStarted {
                start: self.config.start_time,
                now: ctx.timestamp,
            });
        }

        let mut state = self.state.lock();
        if state.has_claimed(&ctx.caller) {
            return Err(ClaimError::AlreadyClaimed(ctx.caller));
        }
        let amount = self.config.claim_amount;
        match state.cumulative_issued().checked_add(amount) {
            Some(next) if next <= self.config.max_supply => {}
            _ => return Err(ClaimError::MaxSupplyReached),
        }

        let cumulative_issued = state.settle(ctx.caller, amount)?;
        info!(account = %ctx.caller, amount, cumulative_issued, "claimed");

        Ok(ClaimReceipt {
            account: ctx.caller,
            amount,
            quotient: U256::from(WAD as u128),
            cumulative_issued,
            timestamp: ctx.timestamp,
        })
    }

    pub fn config(&self) -> &FlatConfig {
        &self.config
    }

    pub fn has_claimed(&self, account: &AccountId) -> bool {
        self.state.lock().has_claimed(account)
    }

    pub fn cumulative_issued(&self) -> u128 {
        self.state.lock().cumulative_issued()
    }

    pub fn remaining_supply(&self) -> u128 {
        self.config
            .max_supply
            .saturating_sub(self.state.lock().cumulative_issued())
    }

    pub fn total_supply(&self) -> u128 {
        self.state.lock().ledger().total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.state.lock().ledger().balance_of(account)
    }
}
