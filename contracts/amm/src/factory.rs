use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, Address, BytesN, Env, Vec,
};

use crate::pool::AmmPoolClient;

#[contracttype]
pub enum FactoryKey {
    Admin,
    Initialized,
    PoolWasm,
    Pool(Address, Address, u32), // canonical (token_0, token_1, fee)
    AllPools,
    SaltCounter,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreated {
    #[topic]
    pub token_0: Address,
    #[topic]
    pub token_1: Address,
    pub fee: u32,
    pub pool: Address,
}

const TTL_THRESHOLD: u32 = 100_000_000;
const TTL_EXTEND_TO: u32 = 200_000_000;

#[contract]
pub struct AmmFactory;

#[contractimpl]
impl AmmFactory {
    pub fn initialize(env: Env, admin: Address) {
        if env.storage().instance().has(&FactoryKey::Initialized) {
            panic!("already initialized");
        }
        admin.require_auth();
        env.storage().instance().set(&FactoryKey::Admin, &admin);
        env.storage().instance().set(&FactoryKey::Initialized, &true);
        bump_ttl(&env);
    }

    pub fn set_pool_wasm(env: Env, admin: Address, hash: BytesN<32>) {
        bump_ttl(&env);
        require_admin(&env, &admin);
        env.storage().instance().set(&FactoryKey::PoolWasm, &hash);
    }

    /// Deploy and register a pool for the pair. Token order is canonicalized
    /// before lookup, so both argument orders land on the same pool.
    pub fn create_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Address {
        bump_ttl(&env);
        let (token_0, token_1) = sort_pair(token_a, token_b);
        let key = FactoryKey::Pool(token_0.clone(), token_1.clone(), fee);
        if env.storage().instance().has(&key) {
            panic!("pool exists");
        }
        let wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&FactoryKey::PoolWasm)
            .expect("pool wasm not set");
        let pool = env
            .deployer()
            .with_current_contract(next_salt(&env))
            .deploy_v2(wasm_hash, ());
        AmmPoolClient::new(&env, &pool).initialize(
            &env.current_contract_address(),
            &token_0,
            &token_1,
            &fee,
        );
        record_pool(&env, key, &token_0, &token_1, fee, &pool);
        pool
    }

    /// Register an externally deployed pool under its pair key. The pool is
    /// read back for its canonical pair so a mis-deployed pool cannot be
    /// registered under the wrong slot.
    pub fn register_pool(env: Env, pool: Address) {
        bump_ttl(&env);
        let client = AmmPoolClient::new(&env, &pool);
        let token_0 = client.token_0();
        let token_1 = client.token_1();
        let fee = client.fee();
        let key = FactoryKey::Pool(token_0.clone(), token_1.clone(), fee);
        if env.storage().instance().has(&key) {
            panic!("pool exists");
        }
        record_pool(&env, key, &token_0, &token_1, fee, &pool);
    }

    pub fn get_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token_0, token_1) = sort_pair(token_a, token_b);
        env.storage()
            .instance()
            .get(&FactoryKey::Pool(token_0, token_1, fee))
    }

    pub fn all_pools(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&FactoryKey::AllPools)
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&FactoryKey::Admin)
            .expect("admin not set")
    }
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

fn next_salt(env: &Env) -> BytesN<32> {
    let counter: u32 = env
        .storage()
        .instance()
        .get(&FactoryKey::SaltCounter)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&FactoryKey::SaltCounter, &(counter + 1));
    let mut salt = [0u8; 32];
    salt[28..].copy_from_slice(&counter.to_be_bytes());
    BytesN::from_array(env, &salt)
}

fn record_pool(
    env: &Env,
    key: FactoryKey,
    token_0: &Address,
    token_1: &Address,
    fee: u32,
    pool: &Address,
) {
    env.storage().instance().set(&key, pool);
    let mut pools: Vec<Address> = env
        .storage()
        .instance()
        .get(&FactoryKey::AllPools)
        .unwrap_or(Vec::new(env));
    pools.push_back(pool.clone());
    env.storage().instance().set(&FactoryKey::AllPools, &pools);
    PoolCreated {
        token_0: token_0.clone(),
        token_1: token_1.clone(),
        fee,
        pool: pool.clone(),
    }
    .publish(env);
}

fn require_admin(env: &Env, admin: &Address) {
    let stored: Address = env
        .storage()
        .instance()
        .get(&FactoryKey::Admin)
        .expect("admin not set");
    if stored != *admin {
        panic!("not admin");
    }
    admin.require_auth();
}

fn bump_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
