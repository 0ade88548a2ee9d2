//! Shared helpers for scenario and adversarial tests.

use trickle_claim::{ClaimController, ClaimReceipt};
use trickle_core::error::ClaimError;
use trickle_core::ledger::MemoryLedger;
use trickle_core::params::DistributionParams;
use trickle_core::types::{AccountId, CallContext};

/// Start time used by every scenario.
pub const T0: u64 = 1_700_000_000;

pub const WEEK: u64 = 7 * 24 * 60 * 60;

/// One billion units, 18 decimals, one week, 2 s steps, 4% per minute.
pub fn scenario_params() -> DistributionParams {
    DistributionParams {
        start_time: T0,
        ..DistributionParams::default()
    }
}

pub fn scenario_controller() -> ClaimController<MemoryLedger> {
    controller_with(scenario_params())
}

pub fn controller_with(params: DistributionParams) -> ClaimController<MemoryLedger> {
    ClaimController::from_params(&params, MemoryLedger::new()).unwrap()
}

/// Deterministic account for an index.
pub fn account(i: u64) -> AccountId {
    AccountId::from_label(&format!("account-{i}"))
}

/// Direct claim by `account(i)` at absolute time `t`.
pub fn claim(
    c: &ClaimController<MemoryLedger>,
    i: u64,
    t: u64,
) -> Result<ClaimReceipt, ClaimError> {
    c.claim(&CallContext::direct(account(i), t))
}

/// `a` within `ppm` parts per million of `b`.
pub fn within_ppm(a: u128, b: u128, ppm: u128) -> bool {
    a.abs_diff(b) <= b / 1_000_000 * ppm
}
