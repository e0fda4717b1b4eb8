use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, token, Address, Env,
};

use crate::{FEE_HIGH, FEE_LOW, FEE_MEDIUM};

#[contracttype]
pub enum PoolKey {
    Factory,
    Token0,
    Token1,
    Fee,
    Price, // u128, set once
    Reserve0,
    Reserve1,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityAdded {
    #[topic]
    pub provider: Address,
    pub amount_0: u128,
    pub amount_1: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Swap {
    #[topic]
    pub trader: Address,
    #[topic]
    pub token_in: Address,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Two-token pool with test-exchange fills: every swap settles one-for-one
/// so scenario arithmetic stays exact.
#[contract]
pub struct AmmPool;

#[contractimpl]
impl AmmPool {
    /// Token addresses must arrive in canonical order. The factory sorts
    /// before deploying; a direct deployment has to do the same.
    pub fn initialize(env: Env, factory: Address, token_0: Address, token_1: Address, fee: u32) {
        let storage = env.storage().persistent();
        if storage.has(&PoolKey::Token0) {
            panic!("already initialized");
        }
        if token_0 >= token_1 {
            panic!("unordered pair");
        }
        if fee != FEE_LOW && fee != FEE_MEDIUM && fee != FEE_HIGH {
            panic!("invalid fee");
        }
        storage.set(&PoolKey::Factory, &factory);
        storage.set(&PoolKey::Token0, &token_0);
        storage.set(&PoolKey::Token1, &token_1);
        storage.set(&PoolKey::Fee, &fee);
        storage.set(&PoolKey::Reserve0, &0u128);
        storage.set(&PoolKey::Reserve1, &0u128);
    }

    /// One-time starting price, token_1 per token_0 scaled 1e6.
    pub fn initialize_price(env: Env, price: u128) {
        let storage = env.storage().persistent();
        ensure_initialized(&env);
        if storage.has(&PoolKey::Price) {
            panic!("already priced");
        }
        storage.set(&PoolKey::Price, &price);
    }

    pub fn add_liquidity(env: Env, provider: Address, amount_0: u128, amount_1: u128) {
        ensure_initialized(&env);
        provider.require_auth();
        let storage = env.storage().persistent();
        let token_0: Address = storage.get(&PoolKey::Token0).expect("pool not initialized");
        let token_1: Address = storage.get(&PoolKey::Token1).expect("pool not initialized");
        let me = env.current_contract_address();
        if amount_0 > 0 {
            token::Client::new(&env, &token_0).transfer(&provider, &me, &to_i128(amount_0));
        }
        if amount_1 > 0 {
            token::Client::new(&env, &token_1).transfer(&provider, &me, &to_i128(amount_1));
        }
        let r0: u128 = storage.get(&PoolKey::Reserve0).unwrap_or(0);
        let r1: u128 = storage.get(&PoolKey::Reserve1).unwrap_or(0);
        storage.set(&PoolKey::Reserve0, &(r0 + amount_0));
        storage.set(&PoolKey::Reserve1, &(r1 + amount_1));
        LiquidityAdded {
            provider,
            amount_0,
            amount_1,
        }
        .publish(&env);
    }

    /// Swap a fixed input for its one-for-one output.
    pub fn swap_exact_in(
        env: Env,
        trader: Address,
        token_in: Address,
        amount_in: u128,
        min_out: u128,
    ) -> u128 {
        ensure_initialized(&env);
        trader.require_auth();
        if amount_in == 0 {
            panic!("bad amount");
        }
        let (token_out, out_key, in_key) = counterparty(&env, &token_in);
        let amount_out = amount_in;
        if amount_out < min_out {
            panic!("slippage");
        }
        settle(
            &env, &trader, &token_in, &token_out, amount_in, amount_out, &in_key, &out_key,
        );
        amount_out
    }

    /// Swap for a fixed output, paying a one-for-one input.
    pub fn swap_exact_out(
        env: Env,
        trader: Address,
        token_out: Address,
        amount_out: u128,
        max_in: u128,
    ) -> u128 {
        ensure_initialized(&env);
        trader.require_auth();
        if amount_out == 0 {
            panic!("bad amount");
        }
        let (token_in, in_key, out_key) = counterparty(&env, &token_out);
        let amount_in = amount_out;
        if amount_in > max_in {
            panic!("slippage");
        }
        settle(
            &env, &trader, &token_in, &token_out, amount_in, amount_out, &in_key, &out_key,
        );
        amount_in
    }

    /// Input required for an exact output, before executing.
    pub fn quote_exact_out(env: Env, token_out: Address, amount_out: u128) -> u128 {
        ensure_initialized(&env);
        let _ = counterparty(&env, &token_out);
        amount_out
    }

    pub fn token_0(env: Env) -> Address {
        env.storage().persistent().get(&PoolKey::Token0).expect("pool not initialized")
    }

    pub fn token_1(env: Env) -> Address {
        env.storage().persistent().get(&PoolKey::Token1).expect("pool not initialized")
    }

    pub fn fee(env: Env) -> u32 {
        env.storage().persistent().get(&PoolKey::Fee).expect("pool not initialized")
    }

    pub fn get_price(env: Env) -> Option<u128> {
        env.storage().persistent().get(&PoolKey::Price)
    }

    pub fn get_reserves(env: Env) -> (u128, u128) {
        let storage = env.storage().persistent();
        (
            storage.get(&PoolKey::Reserve0).unwrap_or(0),
            storage.get(&PoolKey::Reserve1).unwrap_or(0),
        )
    }
}

fn ensure_initialized(env: &Env) {
    if !env.storage().persistent().has(&PoolKey::Token0) {
        panic!("pool not initialized");
    }
}

// Resolves the other side of the pair for a given token. Returned keys are
// (other side reserve, given side reserve).
fn counterparty(env: &Env, given: &Address) -> (Address, PoolKey, PoolKey) {
    let storage = env.storage().persistent();
    let token_0: Address = storage.get(&PoolKey::Token0).expect("pool not initialized");
    let token_1: Address = storage.get(&PoolKey::Token1).expect("pool not initialized");
    if *given == token_0 {
        (token_1, PoolKey::Reserve1, PoolKey::Reserve0)
    } else if *given == token_1 {
        (token_0, PoolKey::Reserve0, PoolKey::Reserve1)
    } else {
        panic!("unknown token");
    }
}

fn settle(
    env: &Env,
    trader: &Address,
    token_in: &Address,
    token_out: &Address,
    amount_in: u128,
    amount_out: u128,
    in_reserve: &PoolKey,
    out_reserve: &PoolKey,
) {
    let storage = env.storage().persistent();
    let out_bal: u128 = storage.get(out_reserve).unwrap_or(0);
    if amount_out > out_bal {
        panic!("not enough reserves");
    }
    let me = env.current_contract_address();
    token::Client::new(env, token_in).transfer(trader, &me, &to_i128(amount_in));
    token::Client::new(env, token_out).transfer(&me, trader, &to_i128(amount_out));
    let in_bal: u128 = storage.get(in_reserve).unwrap_or(0);
    storage.set(in_reserve, &(in_bal + amount_in));
    storage.set(out_reserve, &(out_bal - amount_out));
    Swap {
        trader: trader.clone(),
        token_in: token_in.clone(),
        amount_in,
        amount_out,
    }
    .publish(env);
}

fn to_i128(amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic!("amount exceeds i128");
    }
    amount as i128
}
