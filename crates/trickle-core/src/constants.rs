//! Protocol constants. All fixed-point values are wads (1.0 = 10^18).

/// One whole unit in 18-decimal fixed point.
pub const WAD: i128 = 1_000_000_000_000_000_000;

/// [`WAD`] as an unsigned value, for supply-side arithmetic.
pub const WAD_U128: u128 = WAD as u128;

/// Default decimal precision of the distributed asset.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest supported decimal precision. `10^38` is the last power of ten
/// that fits a `u128`.
pub const MAX_DECIMALS: u8 = 38;

/// Smallest exponent (wad) for which [`wad_exp`](crate::wad::wad_exp) returns
/// a non-zero value: `floor(ln(0.5e-18) * 1e18)`.
pub const EXP_UNDERFLOW_BOUND: i128 = -42_139_678_854_452_767_551;

/// Exponent (wad) at which `e^x * 1e18` no longer fits a signed 256-bit
/// integer: `floor(ln((2^255 - 1) / 1e18) * 1e18)`.
///
/// The decay engine checks this bound before calling the exponential and
/// never evaluates it at or above this value.
pub const EXP_OVERFLOW_BOUND: i128 = 135_305_999_368_893_231_589;

/// `ln(2)` in wad.
pub const LN2_WAD: i128 = 693_147_180_559_945_309;

/// `ln(2)` scaled by 10^36, used for range reduction in the exponential.
pub const LN2_E36: i128 = 693_147_180_559_945_309_417_232_121_458_176_568;

/// Default decay granularity: one minute.
pub const DEFAULT_TIME_UNIT_SECS: u64 = 60;

/// Default host step cadence in seconds.
pub const DEFAULT_STEP_INTERVAL_SECS: u64 = 2;

/// Default target claim period: one week.
pub const DEFAULT_TARGET_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Default decay percent per time unit: 4%.
pub const DEFAULT_DECAY_PERCENT_WAD: u64 = 40_000_000_000_000_000;

/// Default maximum supply in whole units.
pub const DEFAULT_MAX_SUPPLY: u64 = 1_000_000_000;
