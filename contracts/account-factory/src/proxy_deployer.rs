use soroban_sdk::{
    contract, contractimpl, contracttype, Address, BytesN, Env, Vec,
};

use crate::{
    AccountAdopted, AccountCreated, AccountWasmSet, CreatedAccountClient, TTL_EXTEND_TO,
    TTL_THRESHOLD,
};

#[contracttype]
pub enum DataKey {
    Admin,
    Initialized,
    AccountWasm,
    Provider,
    DataProvider,
    Accounts(Address),
    AccountCount,
}

/// Creates proxy accounts that resolve their logic through one shared
/// implementation provider.
#[contract]
pub struct ProxyDeployer;

#[contractimpl]
impl ProxyDeployer {
    pub fn initialize(env: Env, admin: Address, provider: Address, data_provider: Address) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic!("already initialized");
        }
        admin.require_auth();
        let storage = env.storage().instance();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Initialized, &true);
        storage.set(&DataKey::Provider, &provider);
        storage.set(&DataKey::DataProvider, &data_provider);
        bump_ttl(&env);
    }

    pub fn set_account_wasm(env: Env, admin: Address, hash: BytesN<32>) {
        bump_ttl(&env);
        require_admin(&env, &admin);
        env.storage().instance().set(&DataKey::AccountWasm, &hash);
        AccountWasmSet { hash }.publish(&env);
    }

    pub fn create_account(env: Env, owner: Address, salt: BytesN<32>) -> Address {
        bump_ttl(&env);
        owner.require_auth();
        let wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::AccountWasm)
            .expect("wasm hash not set");
        let provider: Address = env
            .storage()
            .instance()
            .get(&DataKey::Provider)
            .expect("deployer not initialized");
        let data_provider: Address = env
            .storage()
            .instance()
            .get(&DataKey::DataProvider)
            .expect("deployer not initialized");

        let account = env
            .deployer()
            .with_current_contract(salt)
            .deploy_v2(wasm_hash, ());
        CreatedAccountClient::new(&env, &account).initialize(&owner, &provider, &data_provider);
        record_account(&env, &owner, &account);
        AccountCreated {
            owner,
            account: account.clone(),
        }
        .publish(&env);
        account
    }

    pub fn adopt_account(env: Env, owner: Address, account: Address) {
        bump_ttl(&env);
        owner.require_auth();
        let reported = CreatedAccountClient::new(&env, &account).get_owner();
        if reported != owner {
            panic!("owner mismatch");
        }
        record_account(&env, &owner, &account);
        AccountAdopted { owner, account }.publish(&env);
    }

    pub fn get_accounts(env: Env, owner: Address) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Accounts(owner))
            .unwrap_or(Vec::new(&env))
    }

    pub fn account_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::AccountCount)
            .unwrap_or(0)
    }

    pub fn get_provider(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Provider)
            .expect("deployer not initialized")
    }

    pub fn get_data_provider(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::DataProvider)
            .expect("deployer not initialized")
    }
}

fn record_account(env: &Env, owner: &Address, account: &Address) {
    let storage = env.storage().instance();
    let mut accounts: Vec<Address> = storage
        .get(&DataKey::Accounts(owner.clone()))
        .unwrap_or(Vec::new(env));
    if accounts.contains(account.clone()) {
        panic!("account exists");
    }
    accounts.push_back(account.clone());
    storage.set(&DataKey::Accounts(owner.clone()), &accounts);
    let count: u64 = storage.get(&DataKey::AccountCount).unwrap_or(0);
    storage.set(&DataKey::AccountCount, &count.saturating_add(1));
}

fn require_admin(env: &Env, admin: &Address) {
    let stored: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
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
