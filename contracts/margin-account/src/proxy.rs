use soroban_sdk::{
    contract, contractimpl, contracttype, Address, Env, IntoVal, Symbol, Vec,
};

use account_facets::{
    AccountContext, MarginOpenExactInParams, MarginOpenExactOutParams, SwapExactInParams,
    SwapExactOutParams,
};

use crate::ImplementationSourceClient;

#[contracttype]
pub enum ProxyAccountKey {
    Owner,
    Provider,
    DataProvider,
}

/// Proxy-routed margin account. Calls go to the provider's default logic
/// contract unless a per-selector override points elsewhere. Dispatched
/// calls carry an `AccountContext` snapshot so the logic contract never has
/// to call back into this account mid-invocation.
#[contract]
pub struct MarginAccountProxy;

#[contractimpl]
impl MarginAccountProxy {
    pub fn initialize(env: Env, owner: Address, provider: Address, data_provider: Address) {
        let storage = env.storage().instance();
        if storage.has(&ProxyAccountKey::Owner) {
            panic!("already initialized");
        }
        storage.set(&ProxyAccountKey::Owner, &owner);
        storage.set(&ProxyAccountKey::Provider, &provider);
        storage.set(&ProxyAccountKey::DataProvider, &data_provider);
        let target = resolve(&env, "register_account");
        env.invoke_contract::<()>(
            &target,
            &Symbol::new(&env, "register_account"),
            (env.current_contract_address(), owner).into_val(&env),
        );
    }

    pub fn get_owner(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ProxyAccountKey::Owner)
            .expect("account not initialized")
    }

    pub fn get_data_provider(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ProxyAccountKey::DataProvider)
            .expect("account not initialized")
    }

    pub fn get_provider(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ProxyAccountKey::Provider)
            .expect("account not initialized")
    }

    /// The default logic contract this proxy points at.
    pub fn get_implementation(env: Env) -> Address {
        let provider = Self::get_provider(env.clone());
        ImplementationSourceClient::new(&env, &provider).get_default_implementation()
    }

    pub fn approve_underlyings(env: Env, protocol_id: u32, underlyings: Vec<Address>) {
        dispatch_unit(&env, "approve_underlyings", (ctx(&env), protocol_id, underlyings));
    }

    pub fn mint(env: Env, protocol_id: u32, underlying: Address, amount: u128) {
        dispatch_unit(&env, "mint", (ctx(&env), protocol_id, underlying, amount));
    }

    pub fn redeem_underlying(env: Env, protocol_id: u32, underlying: Address, amount: u128) {
        dispatch_unit(
            &env,
            "redeem_underlying",
            (ctx(&env), protocol_id, underlying, amount),
        );
    }

    pub fn borrow(env: Env, protocol_id: u32, underlying: Address, amount: u128) {
        dispatch_unit(&env, "borrow", (ctx(&env), protocol_id, underlying, amount));
    }

    pub fn repay_borrow(env: Env, protocol_id: u32, underlying: Address, amount: u128) {
        dispatch_unit(
            &env,
            "repay_borrow",
            (ctx(&env), protocol_id, underlying, amount),
        );
    }

    pub fn enter_markets(env: Env, protocol_id: u32, markets: Vec<Address>) {
        dispatch_unit(&env, "enter_markets", (ctx(&env), protocol_id, markets));
    }

    pub fn swap_borrow_exact_in(env: Env, protocol_id: u32, params: SwapExactInParams) -> u128 {
        dispatch(&env, "swap_borrow_exact_in", (ctx(&env), protocol_id, params))
    }

    pub fn swap_borrow_exact_out(env: Env, protocol_id: u32, params: SwapExactOutParams) -> u128 {
        dispatch(&env, "swap_borrow_exact_out", (ctx(&env), protocol_id, params))
    }

    pub fn swap_collateral_exact_in(
        env: Env,
        protocol_id: u32,
        params: SwapExactInParams,
    ) -> u128 {
        dispatch(
            &env,
            "swap_collateral_exact_in",
            (ctx(&env), protocol_id, params),
        )
    }

    pub fn open_margin_position_exact_in(
        env: Env,
        protocol_id: u32,
        params: MarginOpenExactInParams,
    ) -> u128 {
        dispatch(
            &env,
            "open_margin_position_exact_in",
            (ctx(&env), protocol_id, params),
        )
    }

    pub fn open_margin_position_exact_out(
        env: Env,
        protocol_id: u32,
        params: MarginOpenExactOutParams,
    ) -> u128 {
        dispatch(
            &env,
            "open_margin_position_exact_out",
            (ctx(&env), protocol_id, params),
        )
    }

    pub fn add_manager(env: Env, manager: Address) {
        dispatch_unit(&env, "add_manager", (ctx(&env), manager));
    }

    pub fn remove_manager(env: Env, manager: Address) {
        dispatch_unit(&env, "remove_manager", (ctx(&env), manager));
    }

    pub fn is_manager(env: Env, manager: Address) -> bool {
        let target = resolve(&env, "is_manager");
        env.invoke_contract(
            &target,
            &Symbol::new(&env, "is_manager"),
            (env.current_contract_address(), manager).into_val(&env),
        )
    }
}

fn ctx(env: &Env) -> AccountContext {
    let storage = env.storage().instance();
    AccountContext {
        account: env.current_contract_address(),
        owner: storage
            .get(&ProxyAccountKey::Owner)
            .expect("account not initialized"),
        data_provider: storage
            .get(&ProxyAccountKey::DataProvider)
            .expect("account not initialized"),
    }
}

fn resolve(env: &Env, function: &str) -> Address {
    let provider: Address = env
        .storage()
        .instance()
        .get(&ProxyAccountKey::Provider)
        .expect("account not initialized");
    let source = ImplementationSourceClient::new(env, &provider);
    match source.get_implementation(&Symbol::new(env, function)) {
        Some(implementation) => implementation,
        None => source.get_default_implementation(),
    }
}

fn dispatch<A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>>(
    env: &Env,
    function: &str,
    args: A,
) -> u128 {
    let target = resolve(env, function);
    env.invoke_contract(&target, &Symbol::new(env, function), args.into_val(env))
}

fn dispatch_unit<A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>>(
    env: &Env,
    function: &str,
    args: A,
) {
    let target = resolve(env, function);
    env.invoke_contract::<()>(&target, &Symbol::new(env, function), args.into_val(env))
}
