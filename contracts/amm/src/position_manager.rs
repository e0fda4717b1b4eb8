use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

use crate::factory::AmmFactoryClient;
use crate::pool::AmmPoolClient;

#[contracttype]
pub enum ManagerKey {
    Factory,
    WrappedNative,
    Descriptor,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintParams {
    pub token_0: Address,
    pub token_1: Address,
    pub fee: u32,
    pub amount_0: u128,
    pub amount_1: u128,
    pub recipient: Address,
}

/// Liquidity entry point over the factory's pools.
#[contract]
pub struct PositionManager;

#[contractimpl]
impl PositionManager {
    pub fn initialize(env: Env, factory: Address, wrapped_native: Address, descriptor: Address) {
        let storage = env.storage().instance();
        if storage.has(&ManagerKey::Factory) {
            panic!("already initialized");
        }
        storage.set(&ManagerKey::Factory, &factory);
        storage.set(&ManagerKey::WrappedNative, &wrapped_native);
        storage.set(&ManagerKey::Descriptor, &descriptor);
    }

    /// Find or create the pair's pool, then set its starting price if it has
    /// none yet.
    pub fn create_and_init_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
        price: u128,
    ) -> Address {
        let factory = AmmFactoryClient::new(&env, &Self::factory(env.clone()));
        let pool = match factory.get_pool(&token_a, &token_b, &fee) {
            Some(existing) => existing,
            None => factory.create_pool(&token_a, &token_b, &fee),
        };
        let client = AmmPoolClient::new(&env, &pool);
        if client.get_price().is_none() {
            client.initialize_price(&price);
        }
        pool
    }

    pub fn mint(env: Env, params: MintParams) {
        let factory = AmmFactoryClient::new(&env, &Self::factory(env.clone()));
        let pool = factory
            .get_pool(&params.token_0, &params.token_1, &params.fee)
            .unwrap_or_else(|| panic!("pool not found"));
        AmmPoolClient::new(&env, &pool).add_liquidity(
            &params.recipient,
            &params.amount_0,
            &params.amount_1,
        );
    }

    pub fn factory(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ManagerKey::Factory)
            .expect("manager not initialized")
    }

    pub fn wrapped_native(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ManagerKey::WrappedNative)
            .expect("manager not initialized")
    }

    pub fn descriptor(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ManagerKey::Descriptor)
            .expect("manager not initialized")
    }
}
