use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, Address, Env, Symbol, Val, Vec,
};

/// Storage-light proxy: the unitroller keeps a stable address while the
/// comptroller implementation behind it can be swapped.
#[contracttype]
pub enum ProxyKey {
    Admin,
    Implementation,
    PendingImplementation,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewPendingImplementation {
    #[topic]
    pub implementation: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewImplementation {
    #[topic]
    pub implementation: Address,
}

#[contract]
pub struct Unitroller;

#[contractimpl]
impl Unitroller {
    pub fn initialize(env: Env, admin: Address) {
        let storage = env.storage().persistent();
        if storage.has(&ProxyKey::Admin) {
            panic!("already initialized");
        }
        admin.require_auth();
        storage.set(&ProxyKey::Admin, &admin);
    }

    /// Admin: stage the next implementation. The handshake completes when the
    /// staged contract calls `accept_implementation` on itself.
    pub fn set_pending_implementation(env: Env, implementation: Address) {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&ProxyKey::Admin)
            .expect("admin not set");
        admin.require_auth();
        env.storage()
            .persistent()
            .set(&ProxyKey::PendingImplementation, &implementation);
        NewPendingImplementation { implementation }.publish(&env);
    }

    /// Called by the staged implementation to promote itself.
    pub fn accept_implementation(env: Env, implementation: Address) {
        let storage = env.storage().persistent();
        let pending: Option<Address> = storage.get(&ProxyKey::PendingImplementation);
        if pending.as_ref() != Some(&implementation) {
            panic!("not pending implementation");
        }
        implementation.require_auth();
        storage.set(&ProxyKey::Implementation, &implementation);
        storage.remove(&ProxyKey::PendingImplementation);
        NewImplementation { implementation }.publish(&env);
    }

    pub fn get_implementation(env: Env) -> Option<Address> {
        env.storage().persistent().get(&ProxyKey::Implementation)
    }

    pub fn get_pending_implementation(env: Env) -> Option<Address> {
        env.storage()
            .persistent()
            .get(&ProxyKey::PendingImplementation)
    }

    /// Forward an arbitrary call to the current implementation.
    pub fn forward(env: Env, function: Symbol, args: Vec<Val>) -> Val {
        let implementation: Address = env
            .storage()
            .persistent()
            .get(&ProxyKey::Implementation)
            .unwrap_or_else(|| panic!("no implementation"));
        env.invoke_contract(&implementation, &function, args)
    }
}
