use countersign_types::{Principal, Role};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("{principal} lacks the {role} role required for this operation")]
    Unauthorized { role: Role, principal: Principal },

    #[error("cannot revoke the last remaining admin")]
    LastAdmin,
}
