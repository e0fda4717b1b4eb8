use soroban_sdk::{contract, contractevent, contractimpl, token, vec, Address, Env};

use crate::{
    require_owner, to_i128, AccountContext, MarginOpenExactInParams, MarginOpenExactOutParams,
    MarketClient, PoolClient, RegistryClient, RiskHubClient, SwapExactInParams,
    SwapExactOutParams,
};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowSwapped {
    #[topic]
    pub account: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralSwapped {
    #[topic]
    pub account: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarginPositionOpened {
    #[topic]
    pub account: Address,
    pub supply_token: Address,
    pub borrow_token: Address,
    pub supplied: u128,
    pub borrowed: u128,
}

/// Leveraged flows: debt and collateral are moved between markets through
/// the AMM while the account keeps a single consistent position.
#[contract]
pub struct MarginTraderFacet;

#[contractimpl]
impl MarginTraderFacet {
    /// Move debt out of `token_in`: borrow a fixed amount, sell it for
    /// `token_out`, and pay the proceeds into the `token_out` debt.
    pub fn swap_borrow_exact_in(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        params: SwapExactInParams,
    ) -> u128 {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        let market_in = registry.get_market(&params.token_in, &protocol_id);
        let market_out = registry.get_market(&params.token_out, &protocol_id);
        let pool = registry.get_amm_pool(&params.token_in, &params.token_out);

        MarketClient::new(&env, &market_in).borrow(&ctx.account, &params.amount_in);
        let amount_out = PoolClient::new(&env, &pool).swap_exact_in(
            &ctx.account,
            &params.token_in,
            &params.amount_in,
            &params.min_out,
        );
        MarketClient::new(&env, &market_out).repay_borrow(&ctx.account, &amount_out);
        BorrowSwapped {
            account: ctx.account,
            token_in: params.token_in,
            token_out: params.token_out,
            amount_in: params.amount_in,
            amount_out,
        }
        .publish(&env);
        amount_out
    }

    /// Retire an exact amount of `token_out` debt, borrowing whatever
    /// `token_in` the pool quotes for it.
    pub fn swap_borrow_exact_out(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        params: SwapExactOutParams,
    ) -> u128 {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        let market_in = registry.get_market(&params.token_in, &protocol_id);
        let market_out = registry.get_market(&params.token_out, &protocol_id);
        let pool_addr = registry.get_amm_pool(&params.token_in, &params.token_out);
        let pool = PoolClient::new(&env, &pool_addr);

        let required = pool.quote_exact_out(&params.token_out, &params.amount_out);
        if required > params.max_in {
            panic!("slippage");
        }
        MarketClient::new(&env, &market_in).borrow(&ctx.account, &required);
        pool.swap_exact_out(
            &ctx.account,
            &params.token_out,
            &params.amount_out,
            &params.max_in,
        );
        MarketClient::new(&env, &market_out).repay_borrow(&ctx.account, &params.amount_out);
        BorrowSwapped {
            account: ctx.account,
            token_in: params.token_in,
            token_out: params.token_out,
            amount_in: required,
            amount_out: params.amount_out,
        }
        .publish(&env);
        required
    }

    /// Rotate collateral: redeem from one market, swap, supply the other.
    pub fn swap_collateral_exact_in(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        params: SwapExactInParams,
    ) -> u128 {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        let market_in = registry.get_market(&params.token_in, &protocol_id);
        let market_out = registry.get_market(&params.token_out, &protocol_id);
        let pool = registry.get_amm_pool(&params.token_in, &params.token_out);

        MarketClient::new(&env, &market_in).redeem_underlying(&ctx.account, &params.amount_in);
        let amount_out = PoolClient::new(&env, &pool).swap_exact_in(
            &ctx.account,
            &params.token_in,
            &params.amount_in,
            &params.min_out,
        );
        MarketClient::new(&env, &market_out).mint(&ctx.account, &amount_out);
        CollateralSwapped {
            account: ctx.account,
            token_in: params.token_in,
            token_out: params.token_out,
            amount_in: params.amount_in,
            amount_out,
        }
        .publish(&env);
        amount_out
    }

    /// Open a leveraged long on `supply_token`: the owner's margin plus a
    /// swapped borrow of `borrow_token` both land in the supply market.
    pub fn open_margin_position_exact_in(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        params: MarginOpenExactInParams,
    ) -> u128 {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        let supply_market = registry.get_market(&params.supply_token, &protocol_id);
        let borrow_market = registry.get_market(&params.borrow_token, &protocol_id);
        let pool = registry.get_amm_pool(&params.supply_token, &params.borrow_token);
        let supply_client = MarketClient::new(&env, &supply_market);

        token::Client::new(&env, &params.supply_token).transfer(
            &ctx.owner,
            &ctx.account,
            &to_i128(params.provided_amount),
        );
        supply_client.mint(&ctx.account, &params.provided_amount);
        enter_both(&env, &ctx, protocol_id, &supply_market, &borrow_market);

        MarketClient::new(&env, &borrow_market).borrow(&ctx.account, &params.amount_in);
        let swapped = PoolClient::new(&env, &pool).swap_exact_in(
            &ctx.account,
            &params.borrow_token,
            &params.amount_in,
            &params.min_out,
        );
        supply_client.mint(&ctx.account, &swapped);
        MarginPositionOpened {
            account: ctx.account,
            supply_token: params.supply_token,
            borrow_token: params.borrow_token,
            supplied: params.provided_amount + swapped,
            borrowed: params.amount_in,
        }
        .publish(&env);
        swapped
    }

    /// Exact-out variant: fix the extra collateral and borrow whatever the
    /// pool quotes for it.
    pub fn open_margin_position_exact_out(
        env: Env,
        ctx: AccountContext,
        protocol_id: u32,
        params: MarginOpenExactOutParams,
    ) -> u128 {
        require_owner(&ctx);
        let registry = RegistryClient::new(&env, &ctx.data_provider);
        let supply_market = registry.get_market(&params.supply_token, &protocol_id);
        let borrow_market = registry.get_market(&params.borrow_token, &protocol_id);
        let pool_addr = registry.get_amm_pool(&params.supply_token, &params.borrow_token);
        let pool = PoolClient::new(&env, &pool_addr);
        let supply_client = MarketClient::new(&env, &supply_market);

        let required = pool.quote_exact_out(&params.supply_token, &params.amount_out);
        if required > params.max_in {
            panic!("slippage");
        }
        token::Client::new(&env, &params.supply_token).transfer(
            &ctx.owner,
            &ctx.account,
            &to_i128(params.provided_amount),
        );
        supply_client.mint(&ctx.account, &params.provided_amount);
        enter_both(&env, &ctx, protocol_id, &supply_market, &borrow_market);

        MarketClient::new(&env, &borrow_market).borrow(&ctx.account, &required);
        pool.swap_exact_out(
            &ctx.account,
            &params.supply_token,
            &params.amount_out,
            &params.max_in,
        );
        supply_client.mint(&ctx.account, &params.amount_out);
        MarginPositionOpened {
            account: ctx.account,
            supply_token: params.supply_token,
            borrow_token: params.borrow_token,
            supplied: params.provided_amount + params.amount_out,
            borrowed: required,
        }
        .publish(&env);
        required
    }
}

fn enter_both(
    env: &Env,
    ctx: &AccountContext,
    protocol_id: u32,
    supply_market: &Address,
    borrow_market: &Address,
) {
    let comptroller =
        RegistryClient::new(env, &ctx.data_provider).get_comptroller(&protocol_id);
    RiskHubClient::new(env, &comptroller).enter_markets(
        &ctx.account,
        &vec![env, supply_market.clone(), borrow_market.clone()],
    );
}
