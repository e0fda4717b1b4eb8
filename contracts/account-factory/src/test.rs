#![cfg(test)]

use super::*;
use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::Address as _,
    vec, Address, BytesN, Env,
};

#[contract]
pub struct MockOwnedAccount;

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Owner,
}

#[contractimpl]
impl MockOwnedAccount {
    pub fn initialize(env: Env, owner: Address, _router: Address, _data_provider: Address) {
        env.storage().persistent().set(&MockKey::Owner, &owner);
    }

    pub fn get_owner(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&MockKey::Owner)
            .expect("owner not set")
    }
}

#[test]
fn adopt_account_records_in_order() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let owner = Address::generate(&env);
    let factory = DiamondFactoryClient::new(&env, &env.register(DiamondFactory, ()));
    factory.initialize(&admin, &Address::generate(&env), &Address::generate(&env));

    let first = env.register(MockOwnedAccount, ());
    MockOwnedAccountClient::new(&env, &first).initialize(
        &owner,
        &Address::generate(&env),
        &Address::generate(&env),
    );
    let second = env.register(MockOwnedAccount, ());
    MockOwnedAccountClient::new(&env, &second).initialize(
        &owner,
        &Address::generate(&env),
        &Address::generate(&env),
    );

    factory.adopt_account(&owner, &first);
    factory.adopt_account(&owner, &second);
    assert_eq!(
        factory.get_accounts(&owner),
        vec![&env, first.clone(), second.clone()]
    );
    assert_eq!(factory.account_count(), 2);
}

#[test]
#[should_panic(expected = "owner mismatch")]
fn adopting_someone_elses_account_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let owner = Address::generate(&env);
    let deployer = ProxyDeployerClient::new(&env, &env.register(ProxyDeployer, ()));
    deployer.initialize(&admin, &Address::generate(&env), &Address::generate(&env));

    let account = env.register(MockOwnedAccount, ());
    MockOwnedAccountClient::new(&env, &account).initialize(
        &Address::generate(&env),
        &Address::generate(&env),
        &Address::generate(&env),
    );
    deployer.adopt_account(&owner, &account);
}

#[test]
#[should_panic(expected = "wasm hash not set")]
fn creating_without_wasm_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let factory = DiamondFactoryClient::new(&env, &env.register(DiamondFactory, ()));
    factory.initialize(&admin, &Address::generate(&env), &Address::generate(&env));
    factory.create_account(&Address::generate(&env), &BytesN::from_array(&env, &[0u8; 32]));
}

#[test]
#[should_panic(expected = "already initialized")]
fn double_initialize_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let deployer = ProxyDeployerClient::new(&env, &env.register(ProxyDeployer, ()));
    let provider = Address::generate(&env);
    let data_provider = Address::generate(&env);
    deployer.initialize(&admin, &provider, &data_provider);
    deployer.initialize(&admin, &provider, &data_provider);
}
