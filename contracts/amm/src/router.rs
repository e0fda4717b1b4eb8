use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

use crate::factory::AmmFactoryClient;
use crate::pool::AmmPoolClient;

#[contracttype]
pub enum RouterKey {
    Factory,
    WrappedNative,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_in: u128,
    pub amount_out_minimum: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactOutputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_out: u128,
    pub amount_in_maximum: u128,
}

/// Thin single-hop router over factory-registered pools.
#[contract]
pub struct SwapRouter;

#[contractimpl]
impl SwapRouter {
    pub fn initialize(env: Env, factory: Address, wrapped_native: Address) {
        let storage = env.storage().instance();
        if storage.has(&RouterKey::Factory) {
            panic!("already initialized");
        }
        storage.set(&RouterKey::Factory, &factory);
        storage.set(&RouterKey::WrappedNative, &wrapped_native);
    }

    pub fn exact_input_single(env: Env, params: ExactInputSingleParams) -> u128 {
        let pool = resolve_pool(&env, &params.token_in, &params.token_out, params.fee);
        AmmPoolClient::new(&env, &pool).swap_exact_in(
            &params.recipient,
            &params.token_in,
            &params.amount_in,
            &params.amount_out_minimum,
        )
    }

    pub fn exact_output_single(env: Env, params: ExactOutputSingleParams) -> u128 {
        let pool = resolve_pool(&env, &params.token_in, &params.token_out, params.fee);
        AmmPoolClient::new(&env, &pool).swap_exact_out(
            &params.recipient,
            &params.token_out,
            &params.amount_out,
            &params.amount_in_maximum,
        )
    }

    pub fn factory(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&RouterKey::Factory)
            .expect("router not initialized")
    }

    pub fn wrapped_native(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&RouterKey::WrappedNative)
            .expect("router not initialized")
    }
}

fn resolve_pool(env: &Env, token_in: &Address, token_out: &Address, fee: u32) -> Address {
    let factory: Address = env
        .storage()
        .instance()
        .get(&RouterKey::Factory)
        .expect("router not initialized");
    AmmFactoryClient::new(env, &factory)
        .get_pool(token_in, token_out, &fee)
        .unwrap_or_else(|| panic!("pool not found"))
}
