//! Error types for Trickle.
use thiserror::Error;

use crate::types::AccountId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("fixed-point overflow")] Overflow,
    #[error("division by zero")] DivisionByZero,
    #[error("exponent at or above overflow bound: {0}")] ExpOverflow(i128),
    #[error("logarithm of non-positive value: {0}")] LogUndefined(i128),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("total supply overflow")] SupplyOverflow,
    #[error("balance overflow for {0}")] BalanceOverflow(AccountId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max supply must be positive")] ZeroMaxSupply,
    #[error("claim amount must be positive")] ZeroClaimAmount,
    #[error("max supply {max_supply} not divisible by claim amount {claim_amount}")] UnevenClaimAmount { max_supply: u128, claim_amount: u128 },
    #[error("target duration must be positive")] ZeroDuration,
    #[error("time unit must be positive")] ZeroTimeUnit,
    #[error("network step interval must be positive")] ZeroStepInterval,
    #[error("decay percent must be in (0, 1e18), got {0}")] InvalidDecayPercent(u64),
    #[error("decimals must be at most {max}, got {got}")] InvalidDecimals { got: u8, max: u8 },
    #[error("scaled max supply overflows u128")] SupplyOverflow,
    #[error("start time plus duration overflows")] TimeOverflow,
    #[error("math: {0}")] Math(#[from] MathError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("claims must be made directly by the caller")] RestrictedCaller,
    #[error("claim window opens at {start}, now {now}")] ClaimNotStarted { start: u64, now: u64 },
    #[error("account already claimed: {0}")] AlreadyClaimed(AccountId),
    #[error("max supply reached")] MaxSupplyReached,
    #[error("math: {0}")] Math(#[from] MathError),
    #[error("ledger: {0}")] Ledger(#[from] LedgerError),
}

#[derive(Error, Debug)]
pub enum TrickleError {
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Claim(#[from] ClaimError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_error_wraps_math() {
        let err: ClaimError = MathError::Overflow.into();
        assert_eq!(err, ClaimError::Math(MathError::Overflow));
        assert_eq!(err.to_string(), "math: fixed-point overflow");
    }

    #[test]
    fn not_started_message_has_times() {
        let err = ClaimError::ClaimNotStarted { start: 100, now: 99 };
        assert_eq!(err.to_string(), "claim window opens at 100, now 99");
    }

    #[test]
    fn umbrella_is_transparent() {
        let err: TrickleError = ConfigError::ZeroMaxSupply.into();
        assert_eq!(err.to_string(), "max supply must be positive");
    }
}
