//! Adaptive claim controller.
//!
//! Each claim mints `target_units_per_step / quotient`, where the quotient
//! comes from the decay engine comparing the claim time against the ideal
//! time for the next unit on the linear schedule. The final claim is clamped
//! to whatever supply remains.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use trickle_core::error::{ClaimError, ConfigError};
use trickle_core::params::{DistributionConfig, DistributionParams};
use trickle_core::traits::Ledger;
use trickle_core::types::{AccountId, CallContext};
use trickle_core::wad::{format_wad, time_units_wad, u256_to_u128};
use trickle_core::U256;
use trickle_decay::{multiplier, scale_amount, DecayEngine};

use crate::state::{ClaimReceipt, ClaimState};

/// Dry-run result of the amount computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimQuote {
    /// Wad time units between the claim time and the ideal time for the
    /// next unit. Positive when issuance lags the schedule.
    pub deviation: i128,
    /// Wad multiplier applied to the per-step baseline.
    pub quotient: U256,
    /// Base units the claim would mint, after clamping to remaining supply.
    pub amount: u128,
}

/// Controller for a self-adjusting one-shot distribution.
pub struct ClaimController<L> {
    config: DistributionConfig,
    engine: DecayEngine,
    state: Mutex<ClaimState<L>>,
}

impl<L: Ledger> ClaimController<L> {
    pub fn new(config: DistributionConfig, ledger: L) -> Result<Self, ConfigError> {
        let engine = DecayEngine::from_config(&config)?;
        info!(
            name = config.name(),
            symbol = config.symbol(),
            max_supply = config.max_supply(),
            start = config.start_time(),
            end = config.target_end_time(),
            per_step = config.target_units_per_step(),
            decay_constant = %format_wad(config.decay_constant()),
            "created distribution"
        );
        Ok(Self {
            config,
            engine,
            state: Mutex::new(ClaimState::new(ledger)),
        })
    }

    /// Validate `params` and create the controller.
    pub fn from_params(params: &DistributionParams, ledger: L) -> Result<Self, ConfigError> {
        Self::new(DistributionConfig::from_params(params)?, ledger)
    }

    /// Claim newly issued units for `ctx.caller`.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::RestrictedCaller`] for a relayed call when only direct
    ///   callers are allowed
    /// - [`ClaimError::ClaimNotStarted`] before the start time
    /// - [`ClaimError::AlreadyClaimed`] if the caller has claimed before
    /// - [`ClaimError::MaxSupplyReached`] when a positive amount is due but
    ///   nothing remains to issue
    pub fn claim(&self, ctx: &CallContext) -> Result<ClaimReceipt, ClaimError> {
        self.check_eligible(ctx)?;

        let mut state = self.state.lock();
        if state.has_claimed(&ctx.caller) {
            debug!(account = %ctx.caller, "rejected repeat claim");
            return Err(ClaimError::AlreadyClaimed(ctx.caller));
        }

        let current_supply = state.cumulative_issued();
        let quote = self.compute(ctx.timestamp, current_supply)?;

        if quote.amount == 0 {
            // The account is left unclaimed and may try again later.
            warn!(
                account = %ctx.caller,
                quotient = %quote.quotient,
                "claim computed zero amount; account not marked"
            );
            return Ok(ClaimReceipt {
                account: ctx.caller,
                amount: 0,
                quotient: quote.quotient,
                cumulative_issued: current_supply,
                timestamp: ctx.timestamp,
            });
        }

        let cumulative_issued = state.settle(ctx.caller, quote.amount)?;
        info!(
            account = %ctx.caller,
            amount = quote.amount,
            cumulative_issued,
            deviation = %format_wad(quote.deviation),
            "claimed"
        );

        Ok(ClaimReceipt {
            account: ctx.caller,
            amount: quote.amount,
            quotient: quote.quotient,
            cumulative_issued,
            timestamp: ctx.timestamp,
        })
    }

    /// What a claim at `timestamp` would mint against current issuance.
    ///
    /// Mutates nothing and ignores caller eligibility.
    pub fn quote(&self, timestamp: u64) -> Result<ClaimQuote, ClaimError> {
        self.check_started(timestamp)?;
        let current_supply = self.state.lock().cumulative_issued();
        self.compute(timestamp, current_supply)
    }

    /// Like [`quote`](Self::quote), against a hypothetical cumulative issuance.
    pub fn quote_with_supply(&self, timestamp: u64, issued: u128) -> Result<ClaimQuote, ClaimError> {
        self.check_started(timestamp)?;
        self.compute(timestamp, issued)
    }

    fn check_eligible(&self, ctx: &CallContext) -> Result<(), ClaimError> {
        if self.config.only_direct_callers() && !ctx.is_direct() {
            debug!(caller = %ctx.caller, origin = %ctx.origin, "rejected relayed claim");
            return Err(ClaimError::RestrictedCaller);
        }
        self.check_started(ctx.timestamp)
    }

    fn check_started(&self, timestamp: u64) -> Result<(), ClaimError> {
        let start = self.config.start_time();
        if timestamp < start {
            return Err(ClaimError::ClaimNotStarted {
                start,
                now: timestamp,
            });
        }
        Ok(())
    }

    /// Amount for a claim at `timestamp`, capped at the remaining supply.
    fn compute(&self, timestamp: u64, current_supply: u128) -> Result<ClaimQuote, ClaimError> {
        let elapsed = timestamp - self.config.start_time();
        let actual = time_units_wad(elapsed, self.config.time_unit_secs())?;
        let deviation = self.engine.schedule_deviation(actual, current_supply)?;
        let quotient = multiplier(self.engine.decay_constant(), deviation)?;
        let raw = scale_amount(self.config.target_units_per_step(), quotient)?;

        // A zero amount is never a cap violation, even with nothing left.
        let remaining = self.config.max_supply().saturating_sub(current_supply);
        let amount = match u256_to_u128(raw) {
            Some(amount) if amount <= remaining => amount,
            _ if remaining == 0 => return Err(ClaimError::MaxSupplyReached),
            _ => remaining,
        };

        Ok(ClaimQuote {
            deviation,
            quotient,
            amount,
        })
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn symbol(&self) -> &str {
        self.config.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.config.decimals()
    }

    pub fn max_supply(&self) -> u128 {
        self.config.max_supply()
    }

    pub fn only_direct_callers(&self) -> bool {
        self.config.only_direct_callers()
    }

    pub fn start_time(&self) -> u64 {
        self.config.start_time()
    }

    pub fn target_end_time(&self) -> u64 {
        self.config.target_end_time()
    }

    pub fn target_duration(&self) -> u64 {
        self.config.target_duration_secs()
    }

    pub fn time_unit_secs(&self) -> u64 {
        self.config.time_unit_secs()
    }

    pub fn network_step_interval(&self) -> u64 {
        self.config.network_step_interval_secs()
    }

    pub fn target_units_per_step(&self) -> u128 {
        self.config.target_units_per_step()
    }

    pub fn decay_constant(&self) -> i128 {
        self.engine.decay_constant()
    }

    pub fn has_claimed(&self, account: &AccountId) -> bool {
        self.state.lock().has_claimed(account)
    }

    pub fn claimed_count(&self) -> usize {
        self.state.lock().claimed_count()
    }

    pub fn cumulative_issued(&self) -> u128 {
        self.state.lock().cumulative_issued()
    }

    pub fn remaining_supply(&self) -> u128 {
        self.max_supply()
            .saturating_sub(self.state.lock().cumulative_issued())
    }

    /// Total supply as reported by the ledger.
    pub fn total_supply(&self) -> u128 {
        self.state.lock().ledger().total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.state.lock().ledger().balance_of(account)
    }

    pub fn into_ledger(self) -> L {
        self.state.into_inner().into_ledger()
    }
}
