//! Presale allowlist verification against a committed Merkle root.
//!
//! The list itself never touches the ledger. An entry is the tuple
//! `(address, max_quantity, price_per_token)`; its leaf is
//! `keccak256(xdr(address) || be(max_quantity: u64) || be(price_per_token: i128))`
//! and interior nodes hash their two children in ascending byte order, so a
//! proof is just the list of siblings from leaf to root.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

pub fn leaf_hash(env: &Env, account: &Address, max_quantity: u64, price_per_token: i128) -> BytesN<32> {
    let mut data: Bytes = account.clone().to_xdr(env);
    data.extend_from_array(&max_quantity.to_be_bytes());
    data.extend_from_array(&price_per_token.to_be_bytes());
    env.crypto().keccak256(&data)
}

/// Hash two sibling nodes, smaller first.
pub fn hash_pair(env: &Env, a: &BytesN<32>, b: &BytesN<32>) -> BytesN<32> {
    let (left, right) = if a.to_array() <= b.to_array() {
        (a, b)
    } else {
        (b, a)
    };
    let mut data = Bytes::from_array(env, &left.to_array());
    data.extend_from_array(&right.to_array());
    env.crypto().keccak256(&data)
}

/// True when `proof` links the entry's leaf to `root`. Malformed or foreign
/// proofs simply fail to match.
pub fn verify(
    env: &Env,
    root: &BytesN<32>,
    proof: &Vec<BytesN<32>>,
    account: &Address,
    max_quantity: u64,
    price_per_token: i128,
) -> bool {
    let mut node = leaf_hash(env, account, max_quantity, price_per_token);
    for sibling in proof.iter() {
        node = hash_pair(env, &node, &sibling);
    }
    node == *root
}
