use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, Env};

#[contracttype]
pub enum InitKey {
    Owner(Address), // keyed by account address
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountRegistered {
    #[topic]
    pub account: Address,
    pub owner: Address,
}

/// Registration facet. Accounts call through here once at initialization so
/// ownership is recorded in facet storage as well as on the account itself.
#[contract]
pub struct AccountInit;

#[contractimpl]
impl AccountInit {
    pub fn register_account(env: Env, account: Address, owner: Address) {
        let storage = env.storage().persistent();
        if storage.has(&InitKey::Owner(account.clone())) {
            panic!("already registered");
        }
        storage.set(&InitKey::Owner(account.clone()), &owner);
        AccountRegistered { account, owner }.publish(&env);
    }

    pub fn get_owner(env: Env, account: Address) -> Address {
        env.storage()
            .persistent()
            .get(&InitKey::Owner(account))
            .expect("account not registered")
    }

    pub fn is_registered(env: Env, account: Address) -> bool {
        env.storage().persistent().has(&InitKey::Owner(account))
    }
}
