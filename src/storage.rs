//! Storage keys and typed accessors.
//!
//! Collection-wide values live in instance storage so they share the
//! contract's lifetime. Per-address counters and role grants live in
//! persistent storage and have their TTL bumped whenever they are written.

use soroban_sdk::{contracttype, Address, Env, String};

use crate::{Collaborators, DropError, IssuanceConfig, Role, SaleConfiguration};

const DAY_IN_LEDGERS: u32 = 17_280;
/// Entries are extended once their TTL drops below a week, to 30 days.
pub const TTL_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;
pub const TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    /// Edition cap, royalty rate and funds recipient. Presence marks initialization.
    Issuance,
    /// Current sale configuration, replaced wholesale.
    SaleConfig,
    /// Number of editions reserved so far.
    TotalMinted,
    Name,
    Symbol,
    /// Display owner for marketplaces; distinct from role holders.
    Owner,
    /// Registry, renderer, fee oracle and payment token addresses.
    Collaborators,
    /// Role grant for (role, account).
    Role(Role, Address),
    /// Number of accounts currently holding `Role::Admin`.
    AdminCount,
    /// Editions bought by an address through the public sale.
    PublicMints(Address),
    /// Editions bought by an address through the presale.
    PresaleMints(Address),
    /// Present (temporary storage) while a withdrawal is executing.
    WithdrawLock,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Issuance)
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn issuance(env: &Env) -> Result<IssuanceConfig, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::Issuance)
        .ok_or(DropError::NotInitialized)
}

pub fn set_issuance(env: &Env, config: &IssuanceConfig) {
    env.storage().instance().set(&DataKey::Issuance, config);
}

pub fn sale_config(env: &Env) -> Result<SaleConfiguration, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::SaleConfig)
        .ok_or(DropError::NotInitialized)
}

pub fn set_sale_config(env: &Env, config: &SaleConfiguration) {
    env.storage().instance().set(&DataKey::SaleConfig, config);
}

pub fn collaborators(env: &Env) -> Result<Collaborators, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::Collaborators)
        .ok_or(DropError::NotInitialized)
}

pub fn set_collaborators(env: &Env, collaborators: &Collaborators) {
    env.storage()
        .instance()
        .set(&DataKey::Collaborators, collaborators);
}

pub fn owner(env: &Env) -> Result<Address, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(DropError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn set_collection_info(env: &Env, name: &String, symbol: &String) {
    env.storage().instance().set(&DataKey::Name, name);
    env.storage().instance().set(&DataKey::Symbol, symbol);
}

pub fn name(env: &Env) -> Result<String, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::Name)
        .ok_or(DropError::NotInitialized)
}

pub fn symbol(env: &Env) -> Result<String, DropError> {
    env.storage()
        .instance()
        .get(&DataKey::Symbol)
        .ok_or(DropError::NotInitialized)
}

pub fn total_minted(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TotalMinted)
        .unwrap_or(0)
}

pub fn set_total_minted(env: &Env, total: u64) {
    env.storage().instance().set(&DataKey::TotalMinted, &total);
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get::<DataKey, bool>(&DataKey::Role(role, account.clone()))
        .unwrap_or(false)
}

pub fn set_role(env: &Env, role: Role, account: &Address) {
    let key = DataKey::Role(role, account.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn remove_role(env: &Env, role: Role, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Role(role, account.clone()));
}

pub fn admin_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::AdminCount)
        .unwrap_or(0)
}

pub fn set_admin_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::AdminCount, &count);
}

pub fn public_mints(env: &Env, account: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::PublicMints(account.clone()))
        .unwrap_or(0)
}

pub fn presale_mints(env: &Env, account: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::PresaleMints(account.clone()))
        .unwrap_or(0)
}

/// Total editions `account` has bought through either sale phase.
pub fn purchased_by(env: &Env, account: &Address) -> u64 {
    public_mints(env, account).saturating_add(presale_mints(env, account))
}

pub fn add_public_mints(env: &Env, account: &Address, quantity: u64) {
    let key = DataKey::PublicMints(account.clone());
    let count = public_mints(env, account).saturating_add(quantity);
    env.storage().persistent().set(&key, &count);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn add_presale_mints(env: &Env, account: &Address, quantity: u64) {
    let key = DataKey::PresaleMints(account.clone());
    let count = presale_mints(env, account).saturating_add(quantity);
    env.storage().persistent().set(&key, &count);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
