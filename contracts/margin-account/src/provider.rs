use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, Address, Env, Symbol,
};

#[contracttype]
pub enum ProviderKey {
    Admin,
    Default,
    Implementation(Symbol),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImplementationSet {
    #[topic]
    pub selector: Symbol,
    pub implementation: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefaultImplementationSet {
    pub implementation: Address,
}

/// Implementation book for proxy accounts: a default logic contract plus
/// per-selector overrides.
#[contract]
pub struct ImplementationProvider;

#[contractimpl]
impl ImplementationProvider {
    pub fn initialize(env: Env, admin: Address, default_implementation: Address) {
        let storage = env.storage().persistent();
        if storage.has(&ProviderKey::Admin) {
            panic!("already initialized");
        }
        admin.require_auth();
        storage.set(&ProviderKey::Admin, &admin);
        storage.set(&ProviderKey::Default, &default_implementation);
    }

    pub fn set_implementation(env: Env, selector: Symbol, implementation: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&ProviderKey::Implementation(selector.clone()), &implementation);
        ImplementationSet {
            selector,
            implementation,
        }
        .publish(&env);
    }

    pub fn set_default_implementation(env: Env, implementation: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&ProviderKey::Default, &implementation);
        DefaultImplementationSet { implementation }.publish(&env);
    }

    pub fn get_implementation(env: Env, selector: Symbol) -> Option<Address> {
        env.storage()
            .persistent()
            .get(&ProviderKey::Implementation(selector))
    }

    pub fn get_default_implementation(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&ProviderKey::Default)
            .expect("provider not initialized")
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&ProviderKey::Admin)
            .expect("admin not set")
    }
}

fn require_admin(env: &Env) {
    let admin: Address = env
        .storage()
        .persistent()
        .get(&ProviderKey::Admin)
        .expect("admin not set");
    admin.require_auth();
}
