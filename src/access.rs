//! Capability resolution for gated operations.
//!
//! `Role::Admin` sits above every named role: an admin passes any role check.

use soroban_sdk::{Address, Env};

use crate::{storage, DropError, Role};

/// True if `principal` may act with `role`'s authority.
pub fn has_capability(env: &Env, principal: &Address, role: Role) -> bool {
    storage::has_role(env, Role::Admin, principal) || storage::has_role(env, role, principal)
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), DropError> {
    if !storage::has_role(env, Role::Admin, caller) {
        return Err(DropError::Unauthorized);
    }
    Ok(())
}

pub fn require_role_or_admin(env: &Env, caller: &Address, role: Role) -> Result<(), DropError> {
    if !has_capability(env, caller, role) {
        return Err(DropError::Unauthorized);
    }
    Ok(())
}

/// Record a grant. Returns false if the account already held the role.
pub fn grant(env: &Env, role: Role, account: &Address) -> bool {
    if storage::has_role(env, role, account) {
        return false;
    }
    storage::set_role(env, role, account);
    if role == Role::Admin {
        storage::set_admin_count(env, storage::admin_count(env) + 1);
    }
    true
}

/// Remove a grant. Returns false if the account did not hold the role.
/// The last remaining admin cannot be removed.
pub fn revoke(env: &Env, role: Role, account: &Address) -> Result<bool, DropError> {
    if !storage::has_role(env, role, account) {
        return Ok(false);
    }
    if role == Role::Admin {
        let admins = storage::admin_count(env);
        if admins <= 1 {
            return Err(DropError::Unauthorized);
        }
        storage::set_admin_count(env, admins - 1);
    }
    storage::remove_role(env, role, account);
    Ok(true)
}
