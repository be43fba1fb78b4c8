use arbitrary::Unstructured;
use soroban_sdk::{testutils::Address as _, Address};

use crate::fees::bps_share;
use crate::lock::WithdrawLock;
use crate::test_mocks::{setup, Setup, DEFAULT_FEE_BPS};
use crate::{DropError, Role};

/// Sell `units` editions at `price` so the contract holds `units * price`.
fn sell(s: &Setup, units: u64, price: i128) {
    s.open_public_sale(price, 0);
    let total = price * i128::from(units);
    let buyer = s.buyer(total);
    s.client.purchase(&buyer, &units, &total);
}

#[test]
fn withdraw_pays_fee_then_remainder() {
    let s = setup(100);
    sell(&s, 7, 1_433);
    let balance = 7 * 1_433;

    let split = s.client.withdraw(&s.owner);

    let fee = balance * i128::from(DEFAULT_FEE_BPS) / 10_000;
    assert_eq!(split.fee_recipient, s.fee_recipient);
    assert_eq!(split.fee_bps, DEFAULT_FEE_BPS);
    assert_eq!(split.fee_amount, fee);
    assert_eq!(split.remainder, balance - fee);
    assert_eq!(s.balance(&s.fee_recipient), fee);
    assert_eq!(s.balance(&s.funds_recipient), balance - fee);
    assert_eq!(s.balance(&s.contract_id), 0);
}

#[test]
fn withdraw_truncates_fee_toward_issuer() {
    let s = setup(100);
    s.fee_policy.set_fee(&s.fee_recipient, &1);
    sell(&s, 1, 9_999);

    let split = s.client.withdraw(&s.owner);
    assert_eq!(split.fee_amount, 0);
    assert_eq!(split.remainder, 9_999);
    assert_eq!(s.balance(&s.funds_recipient), 9_999);
}

#[test]
fn withdraw_with_full_fee_pays_protocol_only() {
    let s = setup(100);
    s.fee_policy.set_fee(&s.fee_recipient, &10_000);
    sell(&s, 2, 50);

    s.client.withdraw(&s.owner);
    assert_eq!(s.balance(&s.fee_recipient), 100);
    assert_eq!(s.balance(&s.funds_recipient), 0);
}

#[test]
fn withdraw_of_empty_balance_moves_nothing() {
    let s = setup(100);
    let split = s.client.withdraw(&s.owner);
    assert_eq!(split.fee_amount, 0);
    assert_eq!(split.remainder, 0);
}

#[test]
fn withdraw_rejects_fee_over_100_percent() {
    let s = setup(100);
    s.fee_policy.set_fee(&s.fee_recipient, &10_001);
    sell(&s, 1, 500);

    assert_eq!(
        s.client.try_withdraw(&s.owner),
        Err(Ok(DropError::InvalidFeeBps))
    );
    assert_eq!(s.balance(&s.contract_id), 500);
    assert_eq!(s.balance(&s.fee_recipient), 0);
}

#[test]
fn withdraw_follows_new_funds_recipient() {
    let s = setup(100);
    sell(&s, 1, 1_000);
    let next = Address::generate(&s.env);
    s.client.set_funds_recipient(&s.owner, &next);

    s.client.withdraw(&s.owner);
    assert_eq!(s.balance(&next), 950);
    assert_eq!(s.balance(&s.funds_recipient), 0);
}

#[test]
fn withdraw_requires_sales_manager_or_admin() {
    let s = setup(100);
    sell(&s, 1, 1_000);
    let minter = Address::generate(&s.env);
    s.client.grant_role(&s.owner, &Role::Minter, &minter);

    assert_eq!(
        s.client.try_withdraw(&minter),
        Err(Ok(DropError::Unauthorized))
    );
    assert_eq!(
        s.client.try_withdraw(&s.funds_recipient),
        Err(Ok(DropError::Unauthorized))
    );
    assert_eq!(s.balance(&s.contract_id), 1_000);

    let manager = Address::generate(&s.env);
    s.client
        .grant_role(&s.owner, &Role::SalesManager, &manager);
    s.client.withdraw(&manager);
    assert_eq!(s.balance(&s.contract_id), 0);
}

#[test]
fn withdraw_twice_pays_only_new_revenue() {
    let s = setup(100);
    sell(&s, 1, 1_000);
    s.client.withdraw(&s.owner);
    sell(&s, 1, 2_000);
    let split = s.client.withdraw(&s.owner);

    assert_eq!(split.fee_amount + split.remainder, 2_000);
    assert_eq!(s.balance(&s.fee_recipient), 50 + 100);
    assert_eq!(s.balance(&s.funds_recipient), 950 + 1_900);
}

#[test]
fn withdraw_lock_refuses_nested_acquire() {
    let s = setup(100);
    s.env.as_contract(&s.contract_id, || {
        let held = WithdrawLock::acquire(&s.env).unwrap();
        assert!(matches!(
            WithdrawLock::acquire(&s.env),
            Err(DropError::WithdrawInProgress)
        ));
        drop(held);
        assert!(WithdrawLock::acquire(&s.env).is_ok());
    });
}

#[test]
fn fee_legs_always_sum_to_balance() {
    let seed: [u8; 1024] = core::array::from_fn(|i| (i as u8).wrapping_mul(151).wrapping_add(3));
    let mut u = Unstructured::new(&seed);

    while !u.is_empty() {
        let balance = i128::from(u.arbitrary::<u64>().unwrap());
        let bps = u.int_in_range(0..=10_000u32).unwrap();

        let fee = bps_share(balance, bps).unwrap();
        assert_eq!(fee, balance * i128::from(bps) / 10_000);
        assert!(fee <= balance);
        assert_eq!(fee + (balance - fee), balance);
    }
}

#[test]
fn fee_share_handles_extreme_balances() {
    assert_eq!(bps_share(i128::MAX, 10_000), Ok(i128::MAX));
    assert_eq!(bps_share(i128::MAX, 0), Ok(0));
    assert_eq!(bps_share(-1, 100), Err(DropError::InvalidAmount));
    assert_eq!(bps_share(100, 10_001), Err(DropError::InvalidFeeBps));
}
