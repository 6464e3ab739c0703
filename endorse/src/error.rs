use countersign_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndorseError {
    #[error("endorsement expired: deadline {deadline}, now {now}")]
    Expired { deadline: Timestamp, now: Timestamp },

    #[error("endorsement signer could not be recovered or lacks the endorser role")]
    BadSigner,
}
