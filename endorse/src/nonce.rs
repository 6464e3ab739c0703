//! Per-caller monotonic nonces — the replay defense.

use countersign_types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Monotonic counter per principal. Starts at 0; advances by exactly 1
/// per consumed endorsement; never decreases, never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NonceLedger {
    counters: HashMap<Principal, u64>,
}

impl NonceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The nonce the next endorsement for `principal` must be signed over.
    pub fn current(&self, principal: &Principal) -> u64 {
        self.counters.get(principal).copied().unwrap_or(0)
    }

    /// Consume the current nonce, returning the value that was consumed.
    ///
    /// Only the endorsement engine calls this, and only after full
    /// verification has succeeded.
    pub(crate) fn consume(&mut self, principal: &Principal) -> u64 {
        let nonce = self.current(principal);
        self.counters.insert(*principal, nonce + 1);
        nonce
    }
}
