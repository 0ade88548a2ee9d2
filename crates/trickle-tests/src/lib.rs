//! Integration test suite for Trickle.
//!
//! Scenario tests replay realistic claim timelines against the full stack;
//! adversarial tests try to break the supply cap and the one-claim rule
//! under randomized and concurrent inputs.

pub mod helpers;
