//! Clients for the contracts the drop delegates to.
//!
//! Only the client side is generated here; the registry, renderer and fee
//! oracle are deployed and owned elsewhere.

use soroban_sdk::{contractclient, Address, Bytes, Env, String};

/// Ownership ledger for the editions. Ids are handed out sequentially from 1.
#[contractclient(name = "TokenRegistryClient")]
pub trait TokenRegistry {
    /// Mint `quantity` tokens to `to`; returns the first id assigned.
    fn mint(env: Env, to: Address, quantity: u64) -> u64;
    fn total_minted(env: Env) -> u64;
    fn minted_by(env: Env, owner: Address) -> u64;
    fn owner_of(env: Env, token_id: u64) -> Address;
    fn burn(env: Env, token_id: u64);
}

#[contractclient(name = "MetadataRendererClient")]
pub trait MetadataRenderer {
    fn initialize(env: Env, init: Bytes);
    fn contract_uri(env: Env) -> String;
    fn token_uri(env: Env, token_id: u64) -> String;
}

/// Protocol fee policy. Returns the fee recipient and the fee in basis points
/// applied to withdrawals of the contract identified by `system`.
#[contractclient(name = "FeePolicyClient")]
pub trait FeePolicy {
    fn withdraw_fee_bps(env: Env, system: Address) -> (Address, u32);
}
