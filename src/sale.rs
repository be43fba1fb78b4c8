//! Admission rules for the two sale phases.
//!
//! Nothing here writes state: each function only decides whether a purchase
//! may go ahead and what it costs.

use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::{allowlist, DropError, SaleConfiguration, SalePhase};

pub fn phase(config: &SaleConfiguration) -> SalePhase {
    match (config.public_sale_active, config.presale_active) {
        (false, false) => SalePhase::Inactive,
        (true, false) => SalePhase::PublicOnly,
        (false, true) => SalePhase::PresaleOnly,
        (true, true) => SalePhase::Both,
    }
}

fn cost(price_per_token: i128, quantity: u64) -> Result<i128, DropError> {
    price_per_token
        .checked_mul(i128::from(quantity))
        .ok_or(DropError::WrongPrice)
}

/// Admit a public purchase of `quantity` by a buyer who has already bought
/// `prior` editions. Returns the exact amount owed.
///
/// A `max_per_address` of 0 leaves the public sale uncapped per address.
pub fn admit_public(
    config: &SaleConfiguration,
    quantity: u64,
    prior: u64,
) -> Result<i128, DropError> {
    if !config.public_sale_active {
        return Err(DropError::SaleInactive);
    }
    if config.public_sale_price == 0 {
        return Err(DropError::PriceNotSet);
    }
    if config.max_per_address > 0
        && prior.saturating_add(quantity) > u64::from(config.max_per_address)
    {
        return Err(DropError::AddressCapExceeded);
    }
    cost(config.public_sale_price, quantity)
}

/// Admit a presale purchase backed by an allowlist proof.
///
/// The per-address bound is the entitlement committed in the proof
/// (`max_quantity`), not the public `max_per_address`.
#[allow(clippy::too_many_arguments)]
pub fn admit_presale(
    env: &Env,
    config: &SaleConfiguration,
    buyer: &Address,
    quantity: u64,
    max_quantity: u64,
    price_per_token: i128,
    prior: u64,
    proof: &Vec<BytesN<32>>,
) -> Result<i128, DropError> {
    if !config.presale_active {
        return Err(DropError::PresaleInactive);
    }
    if price_per_token < 0 {
        return Err(DropError::InvalidAmount);
    }
    if !allowlist::verify(
        env,
        &config.presale_merkle_root,
        proof,
        buyer,
        max_quantity,
        price_per_token,
    ) {
        return Err(DropError::NotAllowlisted);
    }
    if prior.saturating_add(quantity) > max_quantity {
        return Err(DropError::AddressCapExceeded);
    }
    cost(price_per_token, quantity)
}

/// Payments must match the amount owed exactly; nothing is refunded or credited.
pub fn require_exact_payment(owed: i128, value: i128) -> Result<(), DropError> {
    if owed != value {
        return Err(DropError::WrongPrice);
    }
    Ok(())
}
