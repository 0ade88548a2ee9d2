//! Creation-time parameters for an adaptive distribution.
//!
//! [`DistributionParams`] is the raw, serde-loadable form. It is validated
//! once into a [`DistributionConfig`], which also carries the values derived
//! at creation (target end time, per-step baseline, decay constant). Neither
//! changes after the distribution is created.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DECAY_PERCENT_WAD, DEFAULT_DECIMALS, DEFAULT_MAX_SUPPLY, DEFAULT_STEP_INTERVAL_SECS,
    DEFAULT_TARGET_DURATION_SECS, DEFAULT_TIME_UNIT_SECS, MAX_DECIMALS, WAD,
};
use crate::error::ConfigError;
use crate::wad::{mul_div, u256_to_u128, wad_ln};

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Raw distribution parameters as supplied by the deployer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DistributionParams {
    pub name: String,
    pub symbol: String,
    /// Decimal precision of the asset.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Hard cap in whole units, before decimal scaling.
    pub max_supply: u64,
    /// Reject claims relayed through an intermediary.
    #[serde(default)]
    pub only_direct_callers: bool,
    /// Unix seconds at which claims open.
    pub start_time: u64,
    /// Ideal length of the full claim period.
    pub target_duration_secs: u64,
    /// Average time between host execution steps.
    pub network_step_interval_secs: u64,
    /// Fraction (wad) by which the multiplier compounds per time unit.
    pub decay_percent_wad: u64,
    /// Granularity at which decay compounds.
    pub time_unit_secs: u64,
}

impl Default for DistributionParams {
    fn default() -> Self {
        Self {
            name: "Trickle".to_string(),
            symbol: "TRKL".to_string(),
            decimals: DEFAULT_DECIMALS,
            max_supply: DEFAULT_MAX_SUPPLY,
            only_direct_callers: false,
            start_time: 0,
            target_duration_secs: DEFAULT_TARGET_DURATION_SECS,
            network_step_interval_secs: DEFAULT_STEP_INTERVAL_SECS,
            decay_percent_wad: DEFAULT_DECAY_PERCENT_WAD,
            time_unit_secs: DEFAULT_TIME_UNIT_SECS,
        }
    }
}

impl DistributionParams {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Validated, immutable distribution configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionConfig {
    name: String,
    symbol: String,
    decimals: u8,
    max_supply: u128,
    only_direct_callers: bool,
    start_time: u64,
    target_end_time: u64,
    target_duration_secs: u64,
    network_step_interval_secs: u64,
    time_unit_secs: u64,
    decay_percent_wad: u64,
    target_units_per_step: u128,
    decay_constant: i128,
}

impl DistributionConfig {
    /// Validate `params` and derive the creation-time values.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroMaxSupply`], [`ConfigError::ZeroDuration`],
    ///   [`ConfigError::ZeroTimeUnit`], [`ConfigError::ZeroStepInterval`] for
    ///   zero-valued parameters
    /// - [`ConfigError::InvalidDecimals`] above [`MAX_DECIMALS`]
    /// - [`ConfigError::InvalidDecayPercent`] outside `(0, 1e18)`
    /// - [`ConfigError::SupplyOverflow`] / [`ConfigError::TimeOverflow`] when
    ///   scaled values do not fit
    pub fn from_params(params: &DistributionParams) -> Result<Self, ConfigError> {
        if params.decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidDecimals {
                got: params.decimals,
                max: MAX_DECIMALS,
            });
        }
        if params.max_supply == 0 {
            return Err(ConfigError::ZeroMaxSupply);
        }
        if params.target_duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if params.time_unit_secs == 0 {
            return Err(ConfigError::ZeroTimeUnit);
        }
        if params.network_step_interval_secs == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }
        let percent = params.decay_percent_wad as i128;
        if percent <= 0 || percent >= WAD {
            return Err(ConfigError::InvalidDecayPercent(params.decay_percent_wad));
        }

        let max_supply = (params.max_supply as u128)
            .checked_mul(10u128.pow(params.decimals as u32))
            .ok_or(ConfigError::SupplyOverflow)?;

        let target_end_time = params
            .start_time
            .checked_add(params.target_duration_secs)
            .ok_or(ConfigError::TimeOverflow)?;

        let per_step = mul_div(
            U256::from(max_supply),
            U256::from(params.network_step_interval_secs),
            U256::from(params.target_duration_secs),
        )?;
        let target_units_per_step = u256_to_u128(per_step).ok_or(ConfigError::SupplyOverflow)?;

        // ln(1 - percent) is strictly negative for percent in (0, 1).
        let decay_constant = wad_ln(WAD - percent)?;

        Ok(Self {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            decimals: params.decimals,
            max_supply,
            only_direct_callers: params.only_direct_callers,
            start_time: params.start_time,
            target_end_time,
            target_duration_secs: params.target_duration_secs,
            network_step_interval_secs: params.network_step_interval_secs,
            time_unit_secs: params.time_unit_secs,
            decay_percent_wad: params.decay_percent_wad,
            target_units_per_step,
            decay_constant,
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

    /// Hard cap in base units.
    pub fn max_supply(&self) -> u128 {
        self.max_supply
    }

    pub fn only_direct_callers(&self) -> bool {
        self.only_direct_callers
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn target_end_time(&self) -> u64 {
        self.target_end_time
    }

    pub fn target_duration_secs(&self) -> u64 {
        self.target_duration_secs
    }

    pub fn network_step_interval_secs(&self) -> u64 {
        self.network_step_interval_secs
    }

    pub fn time_unit_secs(&self) -> u64 {
        self.time_unit_secs
    }

    pub fn decay_percent_wad(&self) -> u64 {
        self.decay_percent_wad
    }

    /// Ideal base units issued per host step at a perfectly even claim rate.
    pub fn target_units_per_step(&self) -> u128 {
        self.target_units_per_step
    }

    /// `ln(1 - decay_percent)` in wad. Always negative.
    pub fn decay_constant(&self) -> i128 {
        self.decay_constant
    }
}
