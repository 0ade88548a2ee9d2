//! Claim timelines against the default week-long distribution.
//!
//! Covered:
//! - The reference timeline: first claim, on-schedule claim, claim at the
//!   target end, claim after exhaustion
//! - Steady cadence at the step interval tracking the baseline
//! - Catch-up after a long idle period
//! - A burst at a single instant being damped
//! - Parameters loaded from JSON

use trickle_claim::ClaimController;
use trickle_core::constants::WAD;
use trickle_core::error::ClaimError;
use trickle_core::ledger::MemoryLedger;
use trickle_core::params::DistributionParams;
use trickle_core::traits::Ledger;
use trickle_core::U256;
use trickle_tests::helpers::*;

const BASELINE: u128 = 3_306_878_306_878_306_878_306;
const MAX_SUPPLY: u128 = 1_000_000_000 * WAD as u128;

#[test]
fn reference_timeline() {
    let c = scenario_controller();
    assert_eq!(c.max_supply(), MAX_SUPPLY);
    assert_eq!(c.target_units_per_step(), BASELINE);
    assert_eq!(c.target_end_time(), T0 + WEEK);

    // Claim at start: exactly on schedule.
    let a = claim(&c, 0, T0).unwrap();
    assert_eq!(a.quotient, U256::from(WAD as u128));
    assert_eq!(a.amount, BASELINE);

    // One step later with one step's worth issued: still on schedule.
    let b = claim(&c, 1, T0 + 2).unwrap();
    assert_eq!(b.amount, BASELINE);
    assert_eq!(b.cumulative_issued, 2 * BASELINE);

    // At the target end the schedule is far behind; the claim takes the rest.
    let end = claim(&c, 2, T0 + WEEK).unwrap();
    assert_eq!(end.amount, MAX_SUPPLY - 2 * BASELINE);
    assert_eq!(end.cumulative_issued, MAX_SUPPLY);

    assert_eq!(claim(&c, 3, T0 + WEEK + 1), Err(ClaimError::MaxSupplyReached));

    let ledger = c.into_ledger();
    assert_eq!(ledger.total_supply(), MAX_SUPPLY);
    assert_eq!(ledger.balance_of(&account(0)), BASELINE);
    assert_eq!(ledger.balance_of(&account(2)), MAX_SUPPLY - 2 * BASELINE);
    assert_eq!(ledger.balance_of(&account(3)), 0);
}

#[test]
fn steady_cadence_tracks_baseline() {
    let c = scenario_controller();
    for i in 0..1_000u64 {
        let r = claim(&c, i, T0 + 2 * i).unwrap();
        assert!(within_ppm(r.amount, BASELINE, 100), "claim {i}: {}", r.amount);
    }
    let expected = 1_000 * BASELINE;
    assert!(within_ppm(c.cumulative_issued(), expected, 100));
}

#[test]
fn slower_cadence_grows_claims() {
    // One claim every 20 s is ten steps per claim. Lag builds until each
    // claim is large enough to keep pace with the schedule.
    let c = scenario_controller();
    claim(&c, 0, T0).unwrap();
    let mut last_amount = 0;
    for i in 1..200u64 {
        let r = claim(&c, i, T0 + 20 * i).unwrap();
        assert!(r.amount > BASELINE, "claim {i}: {}", r.amount);
        assert!(r.amount >= last_amount);
        last_amount = r.amount;
    }
    assert!(c.cumulative_issued() > 200 * BASELINE);

    // ln(0.1) / ln(0.96) ~ 56.4 time units of lag yields ten baselines.
    let deviation = c.quote(T0 + 20 * 199).unwrap().deviation;
    assert!(deviation > 0);
    assert!(deviation < 57 * WAD);
    assert!(last_amount < 10 * BASELINE);
}

#[test]
fn catch_up_after_idle_hour() {
    let c = scenario_controller();
    let gap = T0 + 3_600;
    let first = c.quote(gap).unwrap();
    assert!(first.deviation > 59 * WAD);

    let mut last_amount = u128::MAX;
    let mut last_deviation = first.deviation;
    for i in 0..100u64 {
        let t = gap + 2 * i;
        let r = claim(&c, i, t).unwrap();
        assert!(r.amount > BASELINE);
        assert!(r.amount <= last_amount);
        last_amount = r.amount;

        let deviation = c.quote(t + 2).unwrap().deviation;
        assert!(deviation < last_deviation, "lag did not shrink at claim {i}");
        last_deviation = deviation;
    }
}

#[test]
fn burst_at_start_is_damped() {
    let c = scenario_controller();
    let mut last = u128::MAX;
    for i in 0..1_000u64 {
        let r = claim(&c, i, T0).unwrap();
        assert!(r.amount <= last);
        last = r.amount;
    }
    assert!(c.cumulative_issued() < 1_000 * BASELINE);
    assert!(c.cumulative_issued() < MAX_SUPPLY / 100);
}

#[test]
fn late_first_claim_takes_everything() {
    let c = scenario_controller();
    let r = claim(&c, 0, T0 + 2 * WEEK).unwrap();
    assert_eq!(r.amount, MAX_SUPPLY);
    assert_eq!(r.quotient, U256::one());
    assert_eq!(c.remaining_supply(), 0);
}

#[test]
fn params_from_json() {
    let json = r#"{
        "name": "Trickle",
        "symbol": "TRKL",
        "max_supply": 1000000000,
        "only_direct_callers": true,
        "start_time": 1700000000,
        "target_duration_secs": 604800,
        "network_step_interval_secs": 2,
        "decay_percent_wad": 40000000000000000,
        "time_unit_secs": 60
    }"#;
    let params = DistributionParams::from_json(json).unwrap();
    assert_eq!(params.decimals, 18);
    let c = ClaimController::from_params(&params, MemoryLedger::new()).unwrap();
    assert!(c.only_direct_callers());
    assert_eq!(c.target_units_per_step(), BASELINE);
    assert_eq!(claim(&c, 0, T0).unwrap().amount, BASELINE);
}

#[test]
fn receipt_serializes_to_json() {
    let c = scenario_controller();
    let r = claim(&c, 0, T0).unwrap();
    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains(&format!("\"amount\":{BASELINE}")));
    assert!(json.contains(&format!("\"timestamp\":{T0}")));
    assert!(json.contains("\"quotient\":\"0xde0b6b3a7640000\""));
}
