use soroban_sdk::{contract, contractevent, contractimpl, token, Address, Env, Vec};

use crate::{require_owner, to_i128, AccountContext, MarketClient, RegistryClient, RiskHubClient};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountSupplied {
    #[topic]
    pub account: Address,
    #[topic]
    pub market: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountBorrowed {
    #[topic]
    pub account: Address,
    #[topic]
    pub market: Address,
    pub amount: u128,
}

/// Plain money-market actions executed on behalf of an account. Funds move
/// owner -> account before supplying and account -> owner after redeeming.
#[contract]
pub struct MoneyMarketFacet;

#[contractimpl]
impl MoneyMarketFacet {
    /// Verifies each underlying has a registered market for the protocol.
    /// Markets pull straight from the account balance, so there is no token
    /// approval to grant; the walk catches wiring mistakes early.
    pub fn approve_underlyings(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        underlyings: Vec<Address>,
    ) {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        for underlying in underlyings.iter() {
            if !registry.has_market(&underlying, &protocol_id) {
                panic!("market not registered");
            }
        }
    }

    pub fn mint(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        underlying: Address,
        amount: u128,
    ) {
        require_owner(&ctx);
        let market =
            RegistryClient::new(&env, &ctx.data_provider).get_market(&underlying, &protocol_id);
        token::Client::new(&env, &underlying).transfer(&ctx.owner, &ctx.account, &to_i128(amount));
        MarketClient::new(&env, &market).mint(&ctx.account, &amount);
        AccountSupplied {
            account: ctx.account,
            market,
            amount,
        }
        .publish(&env);
    }

    pub fn redeem_underlying(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        underlying: Address,
        amount: u128,
    ) {
        require_owner(&ctx);
        let market =
            RegistryClient::new(&env, &ctx.data_provider).get_market(&underlying, &protocol_id);
        MarketClient::new(&env, &market).redeem_underlying(&ctx.account, &amount);
        token::Client::new(&env, &underlying).transfer(&ctx.account, &ctx.owner, &to_i128(amount));
    }

    /// Borrowed funds stay in the account as working capital.
    pub fn borrow(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        underlying: Address,
        amount: u128,
    ) {
        require_owner(&ctx);
        let market =
            RegistryClient::new(&env, &ctx.data_provider).get_market(&underlying, &protocol_id);
        MarketClient::new(&env, &market).borrow(&ctx.account, &amount);
        AccountBorrowed {
            account: ctx.account,
            market,
            amount,
        }
        .publish(&env);
    }

    pub fn repay_borrow(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        underlying: Address,
        amount: u128,
    ) {
        require_owner(&ctx);
        let market =
            RegistryClient::new(&env, &ctx.data_provider).get_market(&underlying, &protocol_id);
        MarketClient::new(&env, &market).repay_borrow(&ctx.account, &amount);
    }

    pub fn enter_markets(env: Env, ctx: AccountContext, protocol_id: u32, markets: Vec<Address>) {
        require_owner(&ctx);
        let comptroller =
            RegistryClient::new(&env, &ctx.data_provider).get_comptroller(&protocol_id);
        RiskHubClient::new(&env, &comptroller).enter_markets(&ctx.account, &markets);
    }
}
