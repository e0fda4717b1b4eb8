#![allow(dead_code)]

use soroban_sdk::{
    testutils::Address as _,
    token, vec, Address, Env, String, Symbol,
};

use account_facets::{AccountInit, DelegatorFacet, MarginTraderFacet, MoneyMarketFacet};
use account_factory::{
    DiamondFactory, DiamondFactoryClient, ProxyDeployer, ProxyDeployerClient,
};
use amm::{
    AmmFactory, AmmFactoryClient, AmmPool, AmmPoolClient, PositionDescriptor,
    PositionDescriptorClient, PositionManager, PositionManagerClient, SwapRouter,
    SwapRouterClient, WrappedNative, WrappedNativeClient, FEE_MEDIUM,
};
use comptroller::{Comptroller, ComptrollerClient, Unitroller, UnitrollerClient};
use data_provider::{DataProvider, DataProviderClient};
use facet_manager::{FacetCut, FacetCutAction, FacetManager, FacetManagerClient};
use lending_market::{LendingMarket, LendingMarketClient};
use margin_account::{
    ImplementationProvider, ImplementationProviderClient, MarginAccount, MarginAccountClient,
    MarginAccountProxy, MarginAccountProxyClient,
};
use price_oracle::{PriceOracle, PriceOracleClient};
use rate_model::{FixedRateModel, FixedRateModelClient};

/// One whole token in 18-decimal units.
pub const ONE: u128 = 1_000_000_000_000_000_000;
pub const SCALE_1E6: u128 = 1_000_000;
pub const PROTOCOL: u32 = 0;
/// Deep lending-side liquidity so scenario borrows never hit the cash limit.
pub const SEED_LIQUIDITY: u128 = 1_000_000 * ONE;

pub struct MarketOptions {
    pub token_count: u32,
    /// Collateral factor applied to every market, scaled 1e6.
    pub collateral_factor: u128,
    /// Yearly borrow rate, scaled 1e6. Zero skips the rate model entirely.
    pub borrow_rate: u128,
    /// Initial exchange rate, scaled 1e6. Doubles as the oracle price so a
    /// richer receipt also prices higher.
    pub exchange_rate: u128,
}

impl MarketOptions {
    pub fn flat(token_count: u32, collateral_factor: u128) -> Self {
        MarketOptions {
            token_count,
            collateral_factor,
            borrow_rate: 0,
            exchange_rate: SCALE_1E6,
        }
    }
}

pub struct MoneyMarket<'a> {
    pub admin: Address,
    pub comptroller: ComptrollerClient<'a>,
    pub unitroller: UnitrollerClient<'a>,
    pub oracle: PriceOracleClient<'a>,
    pub reward_token: Address,
    pub tokens: Vec<Address>,
    pub markets: Vec<LendingMarketClient<'a>>,
}

/// Full lending deployment: unitroller fronting a comptroller, oracle,
/// reward token, and `token_count` seeded markets listed in index order.
pub fn market_fixture<'a>(env: &'a Env, opts: &MarketOptions) -> MoneyMarket<'a> {
    let admin = Address::generate(env);

    let unitroller = UnitrollerClient::new(env, &env.register(Unitroller, ()));
    unitroller.initialize(&admin);
    let comptroller = ComptrollerClient::new(env, &env.register(Comptroller, ()));
    comptroller.initialize(&admin);
    unitroller.set_pending_implementation(&comptroller.address);
    comptroller.become_implementation(&unitroller.address);

    let oracle = PriceOracleClient::new(env, &env.register(PriceOracle, ()));
    oracle.initialize(&admin);
    comptroller.set_price_oracle(&oracle.address);

    let reward_token = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    comptroller.set_reward_token(&reward_token);
    comptroller.set_reward_rate(&SCALE_1E6);

    let mut tokens = Vec::new();
    let mut markets = Vec::new();
    for i in 0..opts.token_count {
        let underlying = env
            .register_stellar_asset_contract_v2(admin.clone())
            .address();
        let market = deploy_market(env, &admin, &underlying, opts, i);
        list_market(&comptroller, &oracle, &market.address, opts);
        seed_market(env, &underlying, &market);
        market.set_comptroller(&comptroller.address);
        tokens.push(underlying);
        markets.push(market);
    }

    MoneyMarket {
        admin,
        comptroller,
        unitroller,
        oracle,
        reward_token,
        tokens,
        markets,
    }
}

fn deploy_market<'a>(
    env: &'a Env,
    admin: &Address,
    underlying: &Address,
    opts: &MarketOptions,
    index: u32,
) -> LendingMarketClient<'a> {
    let rate_model = if opts.borrow_rate > 0 {
        let model = FixedRateModelClient::new(env, &env.register(FixedRateModel, ()));
        model.initialize(&opts.borrow_rate);
        Some(model.address.clone())
    } else {
        None
    };
    let market = LendingMarketClient::new(env, &env.register(LendingMarket, ()));
    let name = match index {
        0 => "Receipt 0",
        1 => "Receipt 1",
        2 => "Receipt 2",
        _ => "Receipt N",
    };
    market.initialize(
        underlying,
        &rate_model,
        &opts.exchange_rate,
        &String::from_str(env, name),
        &String::from_str(env, "rTOK"),
        &6u32,
        admin,
    );
    market
}

fn list_market(
    comptroller: &ComptrollerClient,
    oracle: &PriceOracleClient,
    market: &Address,
    opts: &MarketOptions,
) {
    comptroller.support_market(market);
    comptroller.set_collateral_factor(market, &opts.collateral_factor);
    oracle.set_underlying_price(market, &opts.exchange_rate);
}

fn seed_market(env: &Env, underlying: &Address, market: &LendingMarketClient) {
    let whale = Address::generate(env);
    token::StellarAssetClient::new(env, underlying).mint(&whale, &(SEED_LIQUIDITY as i128));
    market.mint(&whale, &SEED_LIQUIDITY);
}

pub struct Exchange<'a> {
    pub admin: Address,
    pub factory: AmmFactoryClient<'a>,
    pub router: SwapRouterClient<'a>,
    pub manager: PositionManagerClient<'a>,
    pub descriptor: PositionDescriptorClient<'a>,
    pub wrapped: WrappedNativeClient<'a>,
    pub native: Address,
}

/// AMM deployment: factory, wrapped native, descriptor, router, and the
/// position manager, wired together the way a mainnet deploy script would.
pub fn exchange_fixture(env: &Env) -> Exchange<'_> {
    let admin = Address::generate(env);
    let factory = AmmFactoryClient::new(env, &env.register(AmmFactory, ()));
    factory.initialize(&admin);

    let native = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let wrapped = WrappedNativeClient::new(env, &env.register(WrappedNative, ()));
    wrapped.initialize(&native);

    let descriptor = PositionDescriptorClient::new(env, &env.register(PositionDescriptor, ()));
    descriptor.initialize(&wrapped.address, &String::from_str(env, "XLM"));

    let router = SwapRouterClient::new(env, &env.register(SwapRouter, ()));
    router.initialize(&factory.address, &wrapped.address);

    let manager = PositionManagerClient::new(env, &env.register(PositionManager, ()));
    manager.initialize(&factory.address, &wrapped.address, &descriptor.address);

    Exchange {
        admin,
        factory,
        router,
        manager,
        descriptor,
        wrapped,
        native,
    }
}

/// Deploy, register, and seed a pool with `amount` on both sides.
pub fn seed_pool<'a>(
    env: &'a Env,
    exchange: &Exchange<'a>,
    token_a: &Address,
    token_b: &Address,
    amount: u128,
) -> AmmPoolClient<'a> {
    let (token_0, token_1) = if token_a < token_b {
        (token_a.clone(), token_b.clone())
    } else {
        (token_b.clone(), token_a.clone())
    };
    let pool = AmmPoolClient::new(env, &env.register(AmmPool, ()));
    pool.initialize(&exchange.factory.address, &token_0, &token_1, &FEE_MEDIUM);
    exchange.factory.register_pool(&pool.address);

    let lp = Address::generate(env);
    token::StellarAssetClient::new(env, &token_0).mint(&lp, &(amount as i128));
    token::StellarAssetClient::new(env, &token_1).mint(&lp, &(amount as i128));
    pool.add_liquidity(&lp, &amount, &amount);
    pool
}

pub struct AccountStack<'a> {
    pub admin: Address,
    pub registry: DataProviderClient<'a>,
    pub facet_manager: FacetManagerClient<'a>,
    pub implementations: ImplementationProviderClient<'a>,
    pub init_facet: Address,
    pub money_facet: Address,
    pub margin_facet: Address,
    pub delegator_facet: Address,
    pub diamond_factory: DiamondFactoryClient<'a>,
    pub proxy_deployer: ProxyDeployerClient<'a>,
}

/// Account-side deployment: registry, facets cut into a facet manager for
/// diamond accounts, an implementation provider for proxy accounts, and the
/// two factories.
pub fn account_fixture<'a>(env: &'a Env, money: &MoneyMarket<'a>) -> AccountStack<'a> {
    let admin = Address::generate(env);

    let registry = DataProviderClient::new(env, &env.register(DataProvider, ()));
    registry.initialize(&admin);
    registry.add_comptroller(&PROTOCOL, &money.comptroller.address);
    for (token, market) in money.tokens.iter().zip(money.markets.iter()) {
        registry.add_market(token, &PROTOCOL, &market.address);
    }

    let init_facet = env.register(AccountInit, ());
    let money_facet = env.register(MoneyMarketFacet, ());
    let margin_facet = env.register(MarginTraderFacet, ());
    let delegator_facet = env.register(DelegatorFacet, ());

    let facet_manager = FacetManagerClient::new(env, &env.register(FacetManager, ()));
    facet_manager.initialize(&admin);
    facet_manager.diamond_cut(&vec![
        env,
        FacetCut {
            facet: init_facet.clone(),
            action: FacetCutAction::Add,
            selectors: vec![env, Symbol::new(env, "register_account")],
        },
        FacetCut {
            facet: money_facet.clone(),
            action: FacetCutAction::Add,
            selectors: money_selectors(env),
        },
        FacetCut {
            facet: margin_facet.clone(),
            action: FacetCutAction::Add,
            selectors: margin_selectors(env),
        },
        FacetCut {
            facet: delegator_facet.clone(),
            action: FacetCutAction::Add,
            selectors: delegator_selectors(env),
        },
    ]);

    let implementations =
        ImplementationProviderClient::new(env, &env.register(ImplementationProvider, ()));
    implementations.initialize(&admin, &money_facet);
    implementations.set_implementation(&Symbol::new(env, "register_account"), &init_facet);
    for selector in margin_selectors(env).iter() {
        implementations.set_implementation(&selector, &margin_facet);
    }
    for selector in delegator_selectors(env).iter() {
        implementations.set_implementation(&selector, &delegator_facet);
    }

    let diamond_factory = DiamondFactoryClient::new(env, &env.register(DiamondFactory, ()));
    diamond_factory.initialize(&admin, &facet_manager.address, &registry.address);
    let proxy_deployer = ProxyDeployerClient::new(env, &env.register(ProxyDeployer, ()));
    proxy_deployer.initialize(&admin, &implementations.address, &registry.address);

    AccountStack {
        admin,
        registry,
        facet_manager,
        implementations,
        init_facet,
        money_facet,
        margin_facet,
        delegator_facet,
        diamond_factory,
        proxy_deployer,
    }
}

pub fn money_selectors(env: &Env) -> soroban_sdk::Vec<Symbol> {
    vec![
        env,
        Symbol::new(env, "approve_underlyings"),
        Symbol::new(env, "mint"),
        Symbol::new(env, "redeem_underlying"),
        Symbol::new(env, "borrow"),
        Symbol::new(env, "repay_borrow"),
        Symbol::new(env, "enter_markets"),
    ]
}

pub fn margin_selectors(env: &Env) -> soroban_sdk::Vec<Symbol> {
    vec![
        env,
        Symbol::new(env, "swap_borrow_exact_in"),
        Symbol::new(env, "swap_borrow_exact_out"),
        Symbol::new(env, "swap_collateral_exact_in"),
        Symbol::new(env, "open_margin_position_exact_in"),
        Symbol::new(env, "open_margin_position_exact_out"),
    ]
}

pub fn delegator_selectors(env: &Env) -> soroban_sdk::Vec<Symbol> {
    vec![
        env,
        Symbol::new(env, "add_manager"),
        Symbol::new(env, "remove_manager"),
        Symbol::new(env, "is_manager"),
    ]
}

/// Deploy a diamond account for `owner` and adopt it into the factory's
/// book-keeping. Native tests cannot upload wasm, so the account contract is
/// registered directly and adopted instead of factory-deployed.
pub fn create_diamond_account<'a>(
    env: &'a Env,
    stack: &AccountStack<'a>,
    owner: &Address,
) -> MarginAccountClient<'a> {
    let account = MarginAccountClient::new(env, &env.register(MarginAccount, ()));
    account.initialize(owner, &stack.facet_manager.address, &stack.registry.address);
    stack.diamond_factory.adopt_account(owner, &account.address);
    account
}

pub fn create_proxy_account<'a>(
    env: &'a Env,
    stack: &AccountStack<'a>,
    owner: &Address,
) -> MarginAccountProxyClient<'a> {
    let account = MarginAccountProxyClient::new(env, &env.register(MarginAccountProxy, ()));
    account.initialize(owner, &stack.implementations.address, &stack.registry.address);
    stack.proxy_deployer.adopt_account(owner, &account.address);
    account
}

pub fn mint_to(env: &Env, token: &Address, to: &Address, amount: u128) {
    token::StellarAssetClient::new(env, token).mint(to, &(amount as i128));
}

pub fn balance_of(env: &Env, token: &Address, who: &Address) -> i128 {
    token::Client::new(env, token).balance(who)
}
