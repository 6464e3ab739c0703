//! State snapshots — capture a deployment's full state at a point in
//! time.
//!
//! Snapshots let a host persist and reload an authority without replaying
//! its operation history. The integrity hash is computed over the exact
//! serialized state bytes, so a tampered or truncated snapshot is
//! detected before anything is restored from it.

use crate::state::CoreState;
use countersign_crypto::blake2b_256;
use countersign_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot integrity hash does not match its contents")]
    IntegrityMismatch,

    #[error("snapshot version {0} is not supported")]
    UnsupportedVersion(u32),

    #[error("snapshot decode failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A versioned, integrity-hashed capture of [`CoreState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Snapshot format version.
    pub version: u32,
    /// When the snapshot was taken.
    pub created_at: Timestamp,
    /// Blake2b-256 of `state_bytes`.
    pub hash: [u8; 32],
    state_bytes: Vec<u8>,
}

impl StateSnapshot {
    pub const VERSION: u32 = 1;

    /// Capture the current state.
    pub fn capture(state: &CoreState, created_at: Timestamp) -> Self {
        let state_bytes =
            bincode::serialize(state).expect("state serialization should not fail");
        let hash = blake2b_256(&state_bytes);
        Self {
            version: Self::VERSION,
            created_at,
            hash,
            state_bytes,
        }
    }

    /// Verify the integrity hash against the stored bytes.
    pub fn verify(&self) -> bool {
        blake2b_256(&self.state_bytes) == self.hash
    }

    /// Rebuild the state, verifying integrity and version first.
    pub fn restore(&self) -> Result<CoreState, SnapshotError> {
        if self.version != Self::VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        if !self.verify() {
            return Err(SnapshotError::IntegrityMismatch);
        }
        bincode::deserialize(&self.state_bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Serialize the whole snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Write the snapshot to disk.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Read a snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
