//! Decay engine: schedule deviation to rate multiplier.
//!
//! The multiplier is the auction-pricing primitive
//! `exp(decay_constant * (actual - ideal))`, used here as a divisor on the
//! per-step baseline instead of as a price. With a negative decay constant,
//! claims later than the schedule (positive deviation) get a multiplier
//! below 1.0 and therefore a larger amount; claims earlier than the schedule
//! get a multiplier above 1.0 and a smaller amount.
//!
//! All arithmetic is integer-only; the multiplier is a 256-bit wad.

use tracing::debug;
use trickle_core::constants::{EXP_OVERFLOW_BOUND, WAD};
use trickle_core::error::{ConfigError, MathError};
use trickle_core::params::DistributionConfig;
use trickle_core::traits::IssuanceSchedule;
use trickle_core::wad::{mul_div, saturating_wad_mul, wad_exp};
use trickle_core::U256;

use crate::schedule::LinearSchedule;

/// Rate multiplier for a schedule deviation of `delta` wad time units.
///
/// If `decay_constant * delta` reaches [`EXP_OVERFLOW_BOUND`] the
/// exponential is not evaluated and the multiplier is `U256::MAX`. A zero
/// result from the exponential is floored to 1, the smallest positive wad,
/// so the multiplier is always a valid divisor.
pub fn multiplier(decay_constant: i128, delta: i128) -> Result<U256, MathError> {
    let exponent = saturating_wad_mul(decay_constant, delta);
    if exponent >= EXP_OVERFLOW_BOUND {
        debug!(decay_constant, delta, exponent, "multiplier saturated at overflow guard");
        return Ok(U256::MAX);
    }
    let quotient = wad_exp(exponent)?;
    Ok(quotient.max(U256::one()))
}

/// Scale the per-step baseline by a multiplier: `baseline * 1e18 / quotient`.
///
/// A quotient of exactly 1.0 returns the baseline unchanged.
pub fn scale_amount(baseline: u128, quotient: U256) -> Result<U256, MathError> {
    mul_div(U256::from(baseline), U256::from(WAD as u128), quotient)
}

/// Exponential decay engine over an issuance schedule.
#[derive(Debug, Clone)]
pub struct DecayEngine<S = LinearSchedule> {
    decay_constant: i128,
    schedule: S,
}

impl DecayEngine<LinearSchedule> {
    /// Build the engine described by a validated configuration.
    pub fn from_config(config: &DistributionConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.decay_constant(),
            LinearSchedule::from_config(config)?,
        ))
    }
}

impl<S: IssuanceSchedule> DecayEngine<S> {
    pub fn new(decay_constant: i128, schedule: S) -> Self {
        Self {
            decay_constant,
            schedule,
        }
    }

    pub fn decay_constant(&self) -> i128 {
        self.decay_constant
    }

    pub fn schedule(&self) -> &S {
        &self.schedule
    }

    /// `actual - ideal` for the unit after `sold`, in wad time units.
    ///
    /// Positive when issuance lags the schedule, negative when it leads.
    pub fn schedule_deviation(&self, time_since_start: i128, sold: u128) -> Result<i128, MathError> {
        let next = sold.checked_add(1).ok_or(MathError::Overflow)?;
        let ideal = self.schedule.target_time_units(next)?;
        time_since_start
            .checked_sub(ideal)
            .ok_or(MathError::Overflow)
    }

    /// Multiplier for a claim at `time_since_start` with `sold` units
    /// already issued.
    pub fn quotient(&self, time_since_start: i128, sold: u128) -> Result<U256, MathError> {
        let delta = self.schedule_deviation(time_since_start, sold)?;
        multiplier(self.decay_constant, delta)
    }
}
