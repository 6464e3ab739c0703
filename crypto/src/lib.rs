//! Cryptographic primitives for the Countersign authorization core.
//!
//! Blake2b-256 hashing for digests, Ed25519 key generation and signing,
//! and signer recovery — the pure verification function the endorsement
//! protocol builds on.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{recover_signer, sign_digest};
