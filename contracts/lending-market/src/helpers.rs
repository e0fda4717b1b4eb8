use soroban_sdk::{token, Address, Env};

use crate::constants::{TTL_EXTEND_TO, TTL_THRESHOLD};
use crate::storage::DataKey;

pub fn ensure_initialized(env: &Env) -> Address {
    bump_core_ttl(env);
    env.storage()
        .persistent()
        .get(&DataKey::Underlying)
        .expect("market not initialized")
}

pub fn bump_core_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&DataKey::Admin) {
        persistent.extend_ttl(&DataKey::Admin, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::Underlying) {
        persistent.extend_ttl(&DataKey::Underlying, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::TotalSupply) {
        persistent.extend_ttl(&DataKey::TotalSupply, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_borrow_state_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&DataKey::TotalBorrows) {
        persistent.extend_ttl(&DataKey::TotalBorrows, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::BorrowIndex) {
        persistent.extend_ttl(&DataKey::BorrowIndex, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::LastAccrual) {
        persistent.extend_ttl(&DataKey::LastAccrual, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_borrow_snapshot_ttl(env: &Env, user: &Address) {
    let persistent = env.storage().persistent();
    let key = DataKey::BorrowSnapshots(user.clone());
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn ptoken_balance(env: &Env, addr: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(addr.clone()))
        .unwrap_or(0u128)
}

pub fn total_ptokens_supply(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0u128)
}

pub fn cash_balance(env: &Env, underlying: &Address) -> u128 {
    let bal = token::Client::new(env, underlying).balance(&env.current_contract_address());
    if bal < 0 {
        panic!("negative cash");
    }
    bal as u128
}

pub fn to_i128(amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic!("amount exceeds i128");
    }
    amount as i128
}
