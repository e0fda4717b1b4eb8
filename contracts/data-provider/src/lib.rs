#![no_std]
use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, Env};

/// Protocol address book. Facets resolve comptrollers, markets, and pools
/// here instead of carrying addresses of their own.
#[contracttype]
pub enum DataKey {
    Admin,
    Comptroller(u32),        // protocol id
    Market(Address, u32),    // (underlying, protocol id)
    Pool(Address, Address),  // canonical (token_0, token_1)
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComptrollerRegistered {
    pub protocol_id: u32,
    pub comptroller: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketRegistered {
    #[topic]
    pub underlying: Address,
    pub protocol_id: u32,
    pub market: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRegistered {
    #[topic]
    pub token_0: Address,
    #[topic]
    pub token_1: Address,
    pub pool: Address,
}

#[contract]
pub struct DataProvider;

#[contractimpl]
impl DataProvider {
    pub fn initialize(env: Env, admin: Address) {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Admin) {
            panic!("already initialized");
        }
        admin.require_auth();
        storage.set(&DataKey::Admin, &admin);
    }

    /// Re-registering a protocol id overwrites it. The newest registration
    /// wins so upgraded deployments replace stale entries.
    pub fn add_comptroller(env: Env, protocol_id: u32, comptroller: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::Comptroller(protocol_id), &comptroller);
        ComptrollerRegistered {
            protocol_id,
            comptroller,
        }
        .publish(&env);
    }

    pub fn get_comptroller(env: Env, protocol_id: u32) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Comptroller(protocol_id))
            .expect("comptroller not registered")
    }

    pub fn add_market(env: Env, underlying: Address, protocol_id: u32, market: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::Market(underlying.clone(), protocol_id), &market);
        MarketRegistered {
            underlying,
            protocol_id,
            market,
        }
        .publish(&env);
    }

    pub fn get_market(env: Env, underlying: Address, protocol_id: u32) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Market(underlying, protocol_id))
            .expect("market not registered")
    }

    pub fn has_market(env: Env, underlying: Address, protocol_id: u32) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Market(underlying, protocol_id))
    }

    pub fn add_amm_pool(env: Env, token_a: Address, token_b: Address, pool: Address) {
        require_admin(&env);
        let (token_0, token_1) = sort_pair(token_a, token_b);
        env.storage()
            .persistent()
            .set(&DataKey::Pool(token_0.clone(), token_1.clone()), &pool);
        PoolRegistered {
            token_0,
            token_1,
            pool,
        }
        .publish(&env);
    }

    pub fn get_amm_pool(env: Env, token_a: Address, token_b: Address) -> Address {
        let (token_0, token_1) = sort_pair(token_a, token_b);
        env.storage()
            .persistent()
            .get(&DataKey::Pool(token_0, token_1))
            .expect("pool not registered")
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set")
    }
}

fn require_admin(env: &Env) {
    let admin: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Admin)
        .expect("admin not set");
    admin.require_auth();
}

fn sort_pair(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a == token_b {
        panic!("identical tokens");
    }
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}
