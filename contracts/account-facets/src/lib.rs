#![no_std]
use soroban_sdk::{contracttype, Address, Env, Vec};

pub mod account_init;
pub mod delegator;
pub mod margin_trader;
pub mod money_market;

pub use account_init::{AccountInit, AccountInitClient};
pub use delegator::{DelegatorFacet, DelegatorFacetClient};
pub use margin_trader::{MarginTraderFacet, MarginTraderFacetClient};
pub use money_market::{MoneyMarketFacet, MoneyMarketFacetClient};


/// Caller context every dispatched facet operation carries. The account
/// contract fills it from its own instance storage; a facet must never call
/// back into the account that is mid-dispatch, so the context travels with
/// the call instead.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountContext {
    pub account: Address,
    pub owner: Address,
    pub data_provider: Address,
}

#[soroban_sdk::contractclient(name = "RegistryClient")]
pub trait AddressRegistry {
    fn get_comptroller(env: Env, protocol_id: u32) -> Address;
    fn get_market(env: Env, underlying: Address, protocol_id: u32) -> Address;
    fn has_market(env: Env, underlying: Address, protocol_id: u32) -> bool;
    fn get_amm_pool(env: Env, token_a: Address, token_b: Address) -> Address;
}

#[soroban_sdk::contractclient(name = "MarketClient")]
pub trait LendingMarketIface {
    fn mint(env: Env, user: Address, amount: u128);
    fn redeem_underlying(env: Env, user: Address, amount: u128);
    fn borrow(env: Env, user: Address, amount: u128);
    fn repay_borrow(env: Env, user: Address, amount: u128);
    fn balance_of(env: Env, user: Address) -> u128;
    fn borrow_balance_stored(env: Env, user: Address) -> u128;
    fn get_underlying(env: Env) -> Address;
}

#[soroban_sdk::contractclient(name = "RiskHubClient")]
pub trait ComptrollerIface {
    fn enter_markets(env: Env, user: Address, markets: Vec<Address>);
}

#[soroban_sdk::contractclient(name = "PoolClient")]
pub trait SwapPool {
    fn swap_exact_in(
        env: Env,
        trader: Address,
        token_in: Address,
        amount_in: u128,
        min_out: u128,
    ) -> u128;
    fn swap_exact_out(
        env: Env,
        trader: Address,
        token_out: Address,
        amount_out: u128,
        max_in: u128,
    ) -> u128;
    fn quote_exact_out(env: Env, token_out: Address, amount_out: u128) -> u128;
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapExactInParams {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub min_out: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapExactOutParams {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_out: u128,
    pub max_in: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarginOpenExactInParams {
    pub supply_token: Address,
    pub borrow_token: Address,
    pub provided_amount: u128,
    pub amount_in: u128,
    pub min_out: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarginOpenExactOutParams {
    pub supply_token: Address,
    pub borrow_token: Address,
    pub provided_amount: u128,
    pub amount_out: u128,
    pub max_in: u128,
}

pub(crate) fn to_i128(amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic!("amount exceeds i128");
    }
    amount as i128
}

/// Authenticate the context's owner. The caller-supplied owner cannot forge
/// anything on its own: every fund movement still requires an authorization
/// from the address it debits.
pub(crate) fn require_owner(ctx: &AccountContext) {
    ctx.owner.require_auth();
}
