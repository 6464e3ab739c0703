//! Role membership sets and admin-gated grant/revoke.

use crate::error::RoleError;
use countersign_types::{Principal, Role};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Mapping from role to the set of principals holding it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    members: HashMap<Role, HashSet<Principal>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy-time initialization: the deployer receives every operational
    /// role except Reviewer. Bypasses the admin check; callable only at
    /// construction, before the registry is reachable by anyone else.
    pub fn bootstrap(deployer: Principal) -> Self {
        let mut registry = Self::new();
        for role in [Role::Admin, Role::Minter, Role::Pauser, Role::Endorser] {
            registry.insert(role, deployer);
        }
        registry
    }

    /// Whether `principal` currently holds `role`.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(principal))
    }

    /// Fail with `Unauthorized` unless `principal` holds `role`.
    pub fn require(&self, role: Role, principal: &Principal) -> Result<(), RoleError> {
        if self.has_role(role, principal) {
            Ok(())
        } else {
            Err(RoleError::Unauthorized {
                role,
                principal: *principal,
            })
        }
    }

    /// Grant `role` to `principal`. Requires `admin` to hold Admin.
    ///
    /// Returns whether the membership actually changed (a repeated grant
    /// is a no-op, not an error).
    pub fn grant(
        &mut self,
        admin: &Principal,
        role: Role,
        principal: Principal,
    ) -> Result<bool, RoleError> {
        self.require(Role::Admin, admin)?;
        Ok(self.insert(role, principal))
    }

    /// Revoke `role` from `principal`. Requires `admin` to hold Admin.
    ///
    /// Revoking the last remaining admin fails with `LastAdmin`; the
    /// registry never ends up without an admin.
    pub fn revoke(
        &mut self,
        admin: &Principal,
        role: Role,
        principal: &Principal,
    ) -> Result<bool, RoleError> {
        self.require(Role::Admin, admin)?;
        if role == Role::Admin
            && self.has_role(Role::Admin, principal)
            && self.member_count(Role::Admin) == 1
        {
            return Err(RoleError::LastAdmin);
        }
        Ok(self
            .members
            .get_mut(&role)
            .is_some_and(|set| set.remove(principal)))
    }

    /// All principals currently holding `role`, in unspecified order.
    pub fn members(&self, role: Role) -> Vec<Principal> {
        self.members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, role: Role) -> usize {
        self.members.get(&role).map_or(0, HashSet::len)
    }

    fn insert(&mut self, role: Role, principal: Principal) -> bool {
        self.members.entry(role).or_default().insert(principal)
    }
}
