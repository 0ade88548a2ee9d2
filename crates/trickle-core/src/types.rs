//! Account identity and invocation context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte account identifier.
///
/// The host supplies these; Trickle only compares them for equality and
/// uses them as ledger keys.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The all-zero account.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a deterministic account id from a human-readable label.
    ///
    /// Used by tooling and tests to name simulated claimants.
    pub fn from_label(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The host-provided context of a single claim invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller; the account that receives the claim.
    pub caller: AccountId,
    /// Account that originated the whole invocation chain. Equal to
    /// `caller` for direct calls, different when relayed through an
    /// intermediary.
    pub origin: AccountId,
    /// Current host time, unix seconds.
    pub timestamp: u64,
}

impl CallContext {
    /// A direct call: caller and origin are the same account.
    pub fn direct(caller: AccountId, timestamp: u64) -> Self {
        Self {
            caller,
            origin: caller,
            timestamp,
        }
    }

    /// A call relayed by `caller` on behalf of `origin`.
    pub fn relayed(caller: AccountId, origin: AccountId, timestamp: u64) -> Self {
        Self {
            caller,
            origin,
            timestamp,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.caller == self.origin
    }
}
