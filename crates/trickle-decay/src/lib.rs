//! # trickle-decay: self-adjusting issuance rate.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Rather than tracking a rolling average claim rate, each claim compares
//! where issuance *is* against where a linear target schedule says it
//! *should be*:
//! - **Target schedule**: cumulative issuance rises linearly from zero at the
//!   start time to the max supply at the target end time. Its inverse gives
//!   the ideal time at which the next unit should be issued.
//! - **Decay multiplier**: `exp(decay_constant * (actual - ideal))`, a wad
//!   factor that shrinks claims issued ahead of schedule and grows claims
//!   issued behind it.
//! - **Overflow guard**: exponents at or above the exponential's valid range
//!   are never evaluated; they map straight to the maximum multiplier.

pub mod engine;
pub mod schedule;

pub use engine::{multiplier, scale_amount, DecayEngine};
pub use schedule::LinearSchedule;
