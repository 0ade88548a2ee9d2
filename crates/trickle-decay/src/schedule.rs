//! Linear target issuance schedule.
//!
//! Cumulative issuance follows a straight line from `(start, 0)` to
//! `(start + duration, max_supply)`. The decay engine only needs the inverse:
//! given `n` units issued, the ideal time (in wad time units since start) at
//! which the `n`-th unit should have been issued.

use trickle_core::constants::WAD;
use trickle_core::error::{ConfigError, MathError};
use trickle_core::params::DistributionConfig;
use trickle_core::traits::IssuanceSchedule;
use trickle_core::wad::mul_div;
use trickle_core::U256;

/// Straight-line schedule from zero to `max_supply` over `duration_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearSchedule {
    max_supply: u128,
    duration_secs: u64,
    time_unit_secs: u64,
}

impl LinearSchedule {
    /// Create a schedule issuing `max_supply` base units over
    /// `duration_secs`, measured in units of `time_unit_secs`.
    pub fn new(max_supply: u128, duration_secs: u64, time_unit_secs: u64) -> Result<Self, ConfigError> {
        if max_supply == 0 {
            return Err(ConfigError::ZeroMaxSupply);
        }
        if duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if time_unit_secs == 0 {
            return Err(ConfigError::ZeroTimeUnit);
        }
        Ok(Self {
            max_supply,
            duration_secs,
            time_unit_secs,
        })
    }

    pub fn from_config(config: &DistributionConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.max_supply(),
            config.target_duration_secs(),
            config.time_unit_secs(),
        )
    }

    /// Ideal issuance per time unit, in wad base units.
    pub fn units_per_time_unit(&self) -> Result<U256, MathError> {
        let numerator = U256::from(self.max_supply)
            .checked_mul(U256::from(self.time_unit_secs))
            .ok_or(MathError::Overflow)?;
        mul_div(numerator, U256::from(WAD as u128), U256::from(self.duration_secs))
    }

    /// Length of the schedule in wad time units.
    pub fn duration_time_units(&self) -> i128 {
        self.duration_secs as i128 * WAD / self.time_unit_secs as i128
    }
}

impl IssuanceSchedule for LinearSchedule {
    fn target_time_units(&self, sold: u128) -> Result<i128, MathError> {
        // sold / (max_supply / duration), kept exact:
        // sold * duration_secs * 1e18 / (max_supply * time_unit_secs)
        let numerator = U256::from(sold)
            .checked_mul(U256::from(self.duration_secs))
            .ok_or(MathError::Overflow)?;
        let denominator = U256::from(self.max_supply) * U256::from(self.time_unit_secs);
        let ideal = mul_div(numerator, U256::from(WAD as u128), denominator)?;
        if ideal.bits() > 127 {
            return Err(MathError::Overflow);
        }
        Ok(ideal.low_u128() as i128)
    }
}
