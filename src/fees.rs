use soroban_sdk::{Address, Env};

use crate::{external::FeePolicyClient, DropError, FeeSplit, BPS_DENOMINATOR};

/// Split `balance` between the protocol fee recipient and the issuer.
///
/// The fee policy is asked for this contract's rate; the fee share truncates
/// toward zero and the remainder takes whatever is left, so the two legs
/// always add up to `balance`.
pub fn split(env: &Env, fee_policy: &Address, balance: i128) -> Result<FeeSplit, DropError> {
    let (fee_recipient, bps) =
        FeePolicyClient::new(env, fee_policy).withdraw_fee_bps(&env.current_contract_address());
    let fee_amount = bps_share(balance, bps)?;
    Ok(FeeSplit {
        fee_recipient,
        fee_bps: bps,
        fee_amount,
        remainder: balance - fee_amount,
    })
}

/// `floor(amount * bps / 10_000)` for a non-negative amount.
pub fn bps_share(amount: i128, bps: u32) -> Result<i128, DropError> {
    if i128::from(bps) > BPS_DENOMINATOR {
        return Err(DropError::InvalidFeeBps);
    }
    if amount < 0 {
        return Err(DropError::InvalidAmount);
    }
    // amount * bps can overflow for very large balances; split the product.
    let whole = amount / BPS_DENOMINATOR;
    let part = amount % BPS_DENOMINATOR;
    Ok(whole * i128::from(bps) + part * i128::from(bps) / BPS_DENOMINATOR)
}
