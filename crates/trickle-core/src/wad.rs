//! Signed 18-decimal fixed-point arithmetic.
//!
//! A wad is an `i128` scaled by [`WAD`] (10^18). All division truncates
//! toward zero. Products are formed at 256-bit width so that two wads can be
//! multiplied without intermediate overflow; results that do not fit back
//! into `i128` are reported as [`MathError::Overflow`].
//!
//! The exponential returns a [`U256`] because `e^x` for `x` up to
//! [`EXP_OVERFLOW_BOUND`] reaches `2^255` once scaled by 10^18.

use primitive_types::U256;

use crate::constants::{EXP_OVERFLOW_BOUND, EXP_UNDERFLOW_BOUND, LN2_E36, WAD};
use crate::error::MathError;

fn magnitude(x: i128) -> U256 {
    U256::from(x.unsigned_abs())
}

/// Narrow a 256-bit magnitude back to a signed value.
fn signed(mag: U256, negative: bool) -> Result<i128, MathError> {
    if mag.bits() <= 127 {
        let v = mag.low_u128() as i128;
        return Ok(if negative { -v } else { v });
    }
    // i128::MIN has no positive counterpart.
    if negative && mag == U256::one() << 127u32 {
        return Ok(i128::MIN);
    }
    Err(MathError::Overflow)
}

/// Narrow a [`U256`] to `u128`, or `None` if it does not fit.
pub fn u256_to_u128(v: U256) -> Option<u128> {
    if v.bits() <= 128 {
        Some(v.low_u128())
    } else {
        None
    }
}

/// Whole number to wad.
pub fn to_wad(n: u64) -> i128 {
    n as i128 * WAD
}

/// `a * b / 1e18`, truncated toward zero.
pub fn wad_mul(a: i128, b: i128) -> Result<i128, MathError> {
    let mag = magnitude(a) * magnitude(b) / magnitude(WAD);
    signed(mag, (a < 0) != (b < 0))
}

/// `a * 1e18 / b`, truncated toward zero.
pub fn wad_div(a: i128, b: i128) -> Result<i128, MathError> {
    if b == 0 {
        return Err(MathError::DivisionByZero);
    }
    let mag = magnitude(a) * magnitude(WAD) / magnitude(b);
    signed(mag, (a < 0) != (b < 0))
}

/// [`wad_mul`] clamped to `i128::MIN`/`i128::MAX` instead of failing.
///
/// The caller is expected to bound-check the result, as the decay engine
/// does against [`EXP_OVERFLOW_BOUND`] and [`EXP_UNDERFLOW_BOUND`].
pub fn saturating_wad_mul(a: i128, b: i128) -> i128 {
    let negative = (a < 0) != (b < 0);
    match wad_mul(a, b) {
        Ok(v) => v,
        Err(_) if negative => i128::MIN,
        Err(_) => i128::MAX,
    }
}

/// `x * y / d` at 256-bit width, truncated.
pub fn mul_div(x: U256, y: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = x.checked_mul(y).ok_or(MathError::Overflow)?;
    Ok(product / d)
}

/// Elapsed seconds expressed as wad time units of `unit_secs` seconds each.
pub fn time_units_wad(elapsed_secs: u64, unit_secs: u64) -> Result<i128, MathError> {
    if unit_secs == 0 {
        return Err(MathError::DivisionByZero);
    }
    // u64::MAX * 1e18 < i128::MAX
    Ok(elapsed_secs as i128 * WAD / unit_secs as i128)
}

/// `e^x` in wad.
///
/// Returns zero for `x <= EXP_UNDERFLOW_BOUND` and
/// [`MathError::ExpOverflow`] for `x >= EXP_OVERFLOW_BOUND`.
///
/// `x` is reduced to `k * ln2 + r` with `|r| <= ln2 / 2`; `e^r` is summed as
/// a Taylor series in wad and the `2^k` factor is applied as a shift.
pub fn wad_exp(x: i128) -> Result<U256, MathError> {
    if x <= EXP_UNDERFLOW_BOUND {
        return Ok(U256::zero());
    }
    if x >= EXP_OVERFLOW_BOUND {
        return Err(MathError::ExpOverflow(x));
    }

    // |x36| < 1.36e38, inside i128.
    let x36 = x * WAD;
    let half = LN2_E36 / 2;
    let k = if x36 >= 0 {
        (x36 + half) / LN2_E36
    } else {
        (x36 - half) / LN2_E36
    };
    let r = (x36 - k * LN2_E36) / WAD;

    let mut sum = WAD;
    let mut term = WAD;
    let mut n: i128 = 1;
    while term != 0 {
        term = term * r / (n * WAD);
        sum += term;
        n += 1;
    }

    // e^r is in (0.70, 1.42) wad, so sum is positive.
    let er = U256::from(sum as u128);
    Ok(if k >= 0 {
        er << (k as u32)
    } else {
        er >> ((-k) as u32)
    })
}

/// `ln(x)` in wad for `x > 0`.
///
/// `x` is normalised to `m * 2^k` with `m` in `[1, 2)`; `ln(m)` is summed as
/// `2 * atanh((m - 1) / (m + 1))`.
pub fn wad_ln(x: i128) -> Result<i128, MathError> {
    if x <= 0 {
        return Err(MathError::LogUndefined(x));
    }

    let mut m = x;
    let mut k: i128 = 0;
    while m >= 2 * WAD {
        m >>= 1;
        k += 1;
    }
    while m < WAD {
        m <<= 1;
        k -= 1;
    }

    let z = (m - WAD) * WAD / (m + WAD);
    let z2 = z * z / WAD;

    let mut sum: i128 = 0;
    let mut term = z;
    let mut odd: i128 = 1;
    while term != 0 {
        sum += term / odd;
        term = term * z2 / WAD;
        odd += 2;
    }

    Ok(k * LN2_E36 / WAD + 2 * sum)
}

/// Render a wad as a decimal string with all 18 fractional digits.
pub fn format_wad(x: i128) -> String {
    let sign = if x < 0 { "-" } else { "" };
    let mag = x.unsigned_abs();
    let unit = WAD as u128;
    format!("{sign}{}.{:018}", mag / unit, mag % unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: i128, b: i128, tol: i128) -> bool {
        (a - b).abs() <= tol
    }

    fn exp_i128(x: i128) -> i128 {
        u256_to_u128(wad_exp(x).unwrap()).unwrap() as i128
    }

    // --- to_wad ---

    #[test]
    fn to_wad_scales() {
        assert_eq!(to_wad(0), 0);
        assert_eq!(to_wad(3), 3 * WAD);
        assert_eq!(to_wad(u64::MAX), u64::MAX as i128 * WAD);
    }

    // --- wad_mul ---

    #[test]
    fn mul_identity() {
        assert_eq!(wad_mul(WAD, 7 * WAD).unwrap(), 7 * WAD);
        assert_eq!(wad_mul(-WAD, 7 * WAD).unwrap(), -7 * WAD);
    }

    #[test]
    fn mul_truncates_toward_zero() {
        // 1.5e-18 rounds to 1e-18 either side of zero.
        assert_eq!(wad_mul(3, WAD / 2).unwrap(), 1);
        assert_eq!(wad_mul(-3, WAD / 2).unwrap(), -1);
    }

    #[test]
    fn mul_wide_intermediate() {
        // 1e20 * 1e20 overflows i128 before rescaling but not after.
        let a = 100 * WAD;
        assert_eq!(wad_mul(a, a).unwrap(), 10_000 * WAD);
    }

    #[test]
    fn mul_overflow_detected() {
        assert_eq!(wad_mul(i128::MAX, 2 * WAD), Err(MathError::Overflow));
    }

    #[test]
    fn mul_min_value_fits() {
        assert_eq!(wad_mul(i128::MIN, WAD).unwrap(), i128::MIN);
    }

    #[test]
    fn saturating_mul_clamps_by_sign() {
        assert_eq!(saturating_wad_mul(i128::MAX, 2 * WAD), i128::MAX);
        assert_eq!(saturating_wad_mul(i128::MAX, -2 * WAD), i128::MIN);
        assert_eq!(saturating_wad_mul(2 * WAD, 3 * WAD), 6 * WAD);
    }

    // --- wad_div ---

    #[test]
    fn div_basic() {
        assert_eq!(wad_div(3 * WAD, 2 * WAD).unwrap(), 3 * WAD / 2);
        assert_eq!(wad_div(WAD, 3 * WAD).unwrap(), 333_333_333_333_333_333);
    }

    #[test]
    fn div_truncates_toward_zero() {
        assert_eq!(wad_div(-WAD, 3 * WAD).unwrap(), -333_333_333_333_333_333);
        assert_eq!(wad_div(1, -2 * WAD).unwrap(), 0);
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(wad_div(WAD, 0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn div_overflow_detected() {
        assert_eq!(wad_div(i128::MAX, 1), Err(MathError::Overflow));
    }

    // --- mul_div ---

    #[test]
    fn mul_div_basic() {
        let r = mul_div(U256::from(10u64), U256::from(3u64), U256::from(4u64)).unwrap();
        assert_eq!(r, U256::from(7u64));
    }

    #[test]
    fn mul_div_by_zero() {
        assert_eq!(
            mul_div(U256::one(), U256::one(), U256::zero()),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn mul_div_overflow() {
        assert_eq!(
            mul_div(U256::MAX, U256::from(2u64), U256::one()),
            Err(MathError::Overflow)
        );
    }

    // --- time_units_wad ---

    #[test]
    fn time_units_minutes() {
        assert_eq!(time_units_wad(120, 60).unwrap(), 2 * WAD);
        assert_eq!(time_units_wad(30, 60).unwrap(), WAD / 2);
        assert_eq!(time_units_wad(0, 60).unwrap(), 0);
    }

    #[test]
    fn time_units_zero_unit() {
        assert_eq!(time_units_wad(1, 0), Err(MathError::DivisionByZero));
    }

    // --- wad_exp ---

    #[test]
    fn exp_zero_is_one() {
        assert_eq!(wad_exp(0).unwrap(), U256::from(WAD as u128));
    }

    #[test]
    fn exp_one_is_e() {
        assert!(close(exp_i128(WAD), 2_718_281_828_459_045_235, 1_000));
    }

    #[test]
    fn exp_negative_one() {
        assert!(close(exp_i128(-WAD), 367_879_441_171_442_321, 1_000));
    }

    #[test]
    fn exp_ln2_is_two() {
        assert!(close(exp_i128(LN2_E36 / WAD), 2 * WAD, 1_000));
    }

    #[test]
    fn exp_large_input() {
        // e^40 = 2.3538526683702e17
        let expected = 235_385_266_837_020i128 * 10i128.pow(21);
        assert!(close(exp_i128(40 * WAD), expected, expected / 1_000_000_000_000));
    }

    #[test]
    fn exp_underflow_returns_zero() {
        assert_eq!(wad_exp(EXP_UNDERFLOW_BOUND).unwrap(), U256::zero());
        assert_eq!(wad_exp(i128::MIN).unwrap(), U256::zero());
    }

    #[test]
    fn exp_just_above_underflow_is_small() {
        assert!(wad_exp(EXP_UNDERFLOW_BOUND + 1).unwrap() <= U256::one());
    }

    #[test]
    fn exp_overflow_bound_rejected() {
        assert_eq!(
            wad_exp(EXP_OVERFLOW_BOUND),
            Err(MathError::ExpOverflow(EXP_OVERFLOW_BOUND))
        );
        assert!(wad_exp(i128::MAX).is_err());
    }

    #[test]
    fn exp_just_below_overflow_fits() {
        let v = wad_exp(EXP_OVERFLOW_BOUND - 1).unwrap();
        assert!(v.bits() <= 256);
        assert!(v > U256::one() << 250u32);
    }

    // --- wad_ln ---

    #[test]
    fn ln_one_is_zero() {
        assert_eq!(wad_ln(WAD).unwrap(), 0);
    }

    #[test]
    fn ln_two() {
        assert!(close(wad_ln(2 * WAD).unwrap(), LN2_E36 / WAD, 100));
    }

    #[test]
    fn ln_e_is_one() {
        assert!(close(wad_ln(2_718_281_828_459_045_235).unwrap(), WAD, 100));
    }

    #[test]
    fn ln_ninety_six_percent() {
        // ln(0.96) = -0.040821994520255129...
        assert!(close(wad_ln(960_000_000_000_000_000).unwrap(), -40_821_994_520_255_129, 100));
    }

    #[test]
    fn ln_smallest_positive() {
        // ln(1e-18) = -41.446531673892822312
        assert!(close(wad_ln(1).unwrap(), -41_446_531_673_892_822_312, 1_000));
    }

    #[test]
    fn ln_non_positive_undefined() {
        assert_eq!(wad_ln(0), Err(MathError::LogUndefined(0)));
        assert_eq!(wad_ln(-WAD), Err(MathError::LogUndefined(-WAD)));
    }

    // --- format_wad ---

    #[test]
    fn format_examples() {
        assert_eq!(format_wad(WAD), "1.000000000000000000");
        assert_eq!(format_wad(-WAD / 4), "-0.250000000000000000");
        assert_eq!(format_wad(0), "0.000000000000000000");
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn exp_monotonic(a in -40i128 * WAD..40 * WAD, b in -40i128 * WAD..40 * WAD) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(wad_exp(lo).unwrap() <= wad_exp(hi).unwrap());
        }

        #[test]
        fn exp_never_errors_in_domain(x in EXP_UNDERFLOW_BOUND..EXP_OVERFLOW_BOUND) {
            prop_assert!(wad_exp(x).is_ok());
        }

        #[test]
        fn ln_inverts_exp(x in -10i128 * WAD..20 * WAD) {
            let e = exp_i128(x);
            let back = wad_ln(e).unwrap();
            prop_assert!(close(back, x, 1_000_000), "ln(exp({})) = {}", x, back);
        }

        #[test]
        fn mul_commutes(a in -(1i128 << 100)..(1i128 << 100), b in -(1i128 << 100)..(1i128 << 100)) {
            prop_assert_eq!(wad_mul(a, b), wad_mul(b, a));
        }
    }
}
