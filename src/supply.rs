use soroban_sdk::Env;

use crate::{storage, DropError};

/// Reserve `quantity` editions against the cap and return the first id.
///
/// Ids are 1-based and contiguous: a reservation of `n` starting from a
/// ledger that has issued `t` editions covers `t + 1 ..= t + n`. The check
/// and the commit happen together, so a failed reservation leaves the
/// counter untouched. An `edition_size` of 0 means the edition is open.
pub fn reserve(env: &Env, edition_size: u64, quantity: u64) -> Result<u64, DropError> {
    if quantity == 0 {
        return Err(DropError::ZeroQuantity);
    }
    let total = storage::total_minted(env);
    let new_total = total.checked_add(quantity).ok_or(DropError::OverCap)?;
    if edition_size > 0 && new_total > edition_size {
        return Err(DropError::OverCap);
    }
    storage::set_total_minted(env, new_total);
    Ok(total + 1)
}

