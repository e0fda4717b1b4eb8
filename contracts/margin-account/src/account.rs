use soroban_sdk::{
    contract, contractimpl, contracttype, Address, Env, IntoVal, Symbol, Vec,
};

use account_facets::{
    AccountContext, MarginOpenExactInParams, MarginOpenExactOutParams, SwapExactInParams,
    SwapExactOutParams,
};

use crate::FacetRouterClient;

#[contracttype]
pub enum AccountKey {
    Owner,
    FacetManager,
    DataProvider,
}

/// Diamond-routed margin account. Every operation resolves its own function
/// name against the facet manager and invokes whichever facet owns it, so
/// cutting a selector in or out changes the account's behavior with no
/// redeploy. Facets cannot call back into an account that is mid-dispatch,
/// so each call carries an `AccountContext` snapshot of this account's
/// owner and registry wiring.
#[contract]
pub struct MarginAccount;

#[contractimpl]
impl MarginAccount {
    pub fn initialize(env: Env, owner: Address, facet_manager: Address, data_provider: Address) {
        let storage = env.storage().instance();
        if storage.has(&AccountKey::Owner) {
            panic!("already initialized");
        }
        storage.set(&AccountKey::Owner, &owner);
        storage.set(&AccountKey::FacetManager, &facet_manager);
        storage.set(&AccountKey::DataProvider, &data_provider);
        let facet = resolve(&env, "register_account");
        env.invoke_contract::<()>(
            &facet,
            &Symbol::new(&env, "register_account"),
            (env.current_contract_address(), owner).into_val(&env),
        );
    }

    pub fn get_owner(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&AccountKey::Owner)
            .expect("account not initialized")
    }

    pub fn get_data_provider(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&AccountKey::DataProvider)
            .expect("account not initialized")
    }

    pub fn get_facet_manager(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&AccountKey::FacetManager)
            .expect("account not initialized")
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
        let facet = resolve(&env, "is_manager");
        env.invoke_contract(
            &facet,
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
            .get(&AccountKey::Owner)
            .expect("account not initialized"),
        data_provider: storage
            .get(&AccountKey::DataProvider)
            .expect("account not initialized"),
    }
}

fn resolve(env: &Env, function: &str) -> Address {
    let manager: Address = env
        .storage()
        .instance()
        .get(&AccountKey::FacetManager)
        .expect("account not initialized");
    FacetRouterClient::new(env, &manager)
        .facet_address(&Symbol::new(env, function))
        .unwrap_or_else(|| panic!("function not found"))
}

fn dispatch<A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>>(
    env: &Env,
    function: &str,
    args: A,
) -> u128 {
    let facet = resolve(env, function);
    env.invoke_contract(&facet, &Symbol::new(env, function), args.into_val(env))
}

fn dispatch_unit<A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>>(
    env: &Env,
    function: &str,
    args: A,
) {
    let facet = resolve(env, function);
    env.invoke_contract::<()>(&facet, &Symbol::new(env, function), args.into_val(env))
}
