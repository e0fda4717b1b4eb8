#![no_std]
use soroban_sdk::{
    contract, contractclient, contractevent, contractimpl, contracttype, Address, Env, Vec,
};

pub mod unitroller;
pub use unitroller::{Unitroller, UnitrollerClient};

#[cfg(test)]
mod test;

pub const SCALE_1E6: u128 = 1_000_000u128;

const TTL_THRESHOLD: u32 = 100_000_000;
const TTL_EXTEND_TO: u32 = 200_000_000;

#[contracttype]
pub enum DataKey {
    Admin,
    Oracle,                     // Address (optional)
    RewardToken,                // Address (optional)
    RewardRateScaled,           // u128 scaled 1e6
    CloseFactorScaled,          // u128 scaled 1e6
    LiquidationIncentiveScaled, // u128 scaled 1e6
    AllMarkets,                 // Vec<Address>, listing order
    Listed(Address),            // bool
    MarketCF(Address),          // u128 scaled 1e6
    UserMarkets(Address),       // Vec<Address>
    Unitroller,                 // Address (optional)
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketListed {
    #[topic]
    pub market: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketEntered {
    #[topic]
    pub account: Address,
    #[topic]
    pub market: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketCollateralFactorUpdated {
    #[topic]
    pub market: Address,
    pub cf_scaled: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleUpdated {
    pub oracle: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CloseFactorUpdated {
    pub close_factor_scaled: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidationIncentiveUpdated {
    pub incentive_scaled: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTokenSet {
    pub token: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateUpdated {
    pub rate_scaled: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImplementationAdopted {
    #[topic]
    pub unitroller: Address,
}

/// Market surface the liquidity walk needs.
#[contractclient(name = "MarketClient")]
pub trait MarketView {
    fn balance_of(env: Env, user: Address) -> u128;
    fn borrow_balance_stored(env: Env, user: Address) -> u128;
    fn get_exchange_rate(env: Env) -> u128;
}

#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn get_underlying_price(env: Env, market: Address) -> Option<u128>;
}

#[contract]
pub struct Comptroller;

#[contractimpl]
impl Comptroller {
    pub fn initialize(env: Env, admin: Address) {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Admin) {
            panic!("already initialized");
        }
        admin.require_auth();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::CloseFactorScaled, &500_000u128);
        storage.set(&DataKey::LiquidationIncentiveScaled, &SCALE_1E6);
        storage.set(&DataKey::AllMarkets, &Vec::<Address>::new(&env));
        storage.extend_ttl(&DataKey::Admin, TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    /// Admin: list a market. Listing order is preserved.
    pub fn support_market(env: Env, market: Address) {
        require_admin(&env);
        let storage = env.storage().persistent();
        if storage
            .get::<_, bool>(&DataKey::Listed(market.clone()))
            .unwrap_or(false)
        {
            panic!("already listed");
        }
        storage.set(&DataKey::Listed(market.clone()), &true);
        let mut markets: Vec<Address> = storage
            .get(&DataKey::AllMarkets)
            .unwrap_or(Vec::new(&env));
        markets.push_back(market.clone());
        storage.set(&DataKey::AllMarkets, &markets);
        MarketListed { market }.publish(&env);
    }

    pub fn get_all_markets(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::AllMarkets)
            .unwrap_or(Vec::new(&env))
    }

    pub fn is_listed(env: Env, market: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Listed(market))
            .unwrap_or(false)
    }

    pub fn set_collateral_factor(env: Env, market: Address, cf_scaled: u128) {
        require_admin(&env);
        let storage = env.storage().persistent();
        if !storage
            .get::<_, bool>(&DataKey::Listed(market.clone()))
            .unwrap_or(false)
        {
            panic!("market not listed");
        }
        if cf_scaled > SCALE_1E6 {
            panic!("invalid collateral factor");
        }
        storage.set(&DataKey::MarketCF(market.clone()), &cf_scaled);
        MarketCollateralFactorUpdated { market, cf_scaled }.publish(&env);
    }

    pub fn get_collateral_factor(env: Env, market: Address) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::MarketCF(market))
            .unwrap_or(0)
    }

    /// Opt the user's supplied balances in as collateral.
    pub fn enter_markets(env: Env, user: Address, markets: Vec<Address>) {
        user.require_auth();
        let storage = env.storage().persistent();
        let mut entered: Vec<Address> = storage
            .get(&DataKey::UserMarkets(user.clone()))
            .unwrap_or(Vec::new(&env));
        for market in markets.iter() {
            if !storage
                .get::<_, bool>(&DataKey::Listed(market.clone()))
                .unwrap_or(false)
            {
                panic!("market not listed");
            }
            if !entered.contains(market.clone()) {
                entered.push_back(market.clone());
                MarketEntered {
                    account: user.clone(),
                    market,
                }
                .publish(&env);
            }
        }
        storage.set(&DataKey::UserMarkets(user), &entered);
    }

    pub fn get_user_markets(env: Env, user: Address) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::UserMarkets(user))
            .unwrap_or(Vec::new(&env))
    }

    pub fn set_price_oracle(env: Env, oracle: Address) {
        require_admin(&env);
        env.storage().persistent().set(&DataKey::Oracle, &oracle);
        OracleUpdated { oracle }.publish(&env);
    }

    pub fn get_oracle(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Oracle)
    }

    pub fn set_reward_token(env: Env, token: Address) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::RewardToken, &token);
        RewardTokenSet { token }.publish(&env);
    }

    pub fn get_reward_token(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::RewardToken)
    }

    pub fn set_reward_rate(env: Env, rate_scaled: u128) {
        require_admin(&env);
        env.storage()
            .persistent()
            .set(&DataKey::RewardRateScaled, &rate_scaled);
        RewardRateUpdated { rate_scaled }.publish(&env);
    }

    pub fn get_reward_rate(env: Env) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::RewardRateScaled)
            .unwrap_or(0)
    }

    pub fn set_close_factor(env: Env, close_factor_scaled: u128) {
        require_admin(&env);
        if close_factor_scaled > SCALE_1E6 {
            panic!("invalid close factor");
        }
        env.storage()
            .persistent()
            .set(&DataKey::CloseFactorScaled, &close_factor_scaled);
        CloseFactorUpdated {
            close_factor_scaled,
        }
        .publish(&env);
    }

    pub fn get_close_factor(env: Env) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::CloseFactorScaled)
            .unwrap_or(500_000)
    }

    pub fn set_liquidation_incentive(env: Env, incentive_scaled: u128) {
        require_admin(&env);
        if incentive_scaled < SCALE_1E6 {
            panic!("invalid incentive");
        }
        env.storage()
            .persistent()
            .set(&DataKey::LiquidationIncentiveScaled, &incentive_scaled);
        LiquidationIncentiveUpdated { incentive_scaled }.publish(&env);
    }

    pub fn get_liquidation_incentive(env: Env) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::LiquidationIncentiveScaled)
            .unwrap_or(SCALE_1E6)
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set")
    }

    /// Adopt a unitroller front: registers this contract as its
    /// implementation so calls can be forwarded through the stable address.
    pub fn become_implementation(env: Env, unitroller: Address) {
        require_admin(&env);
        UnitrollerClient::new(&env, &unitroller)
            .accept_implementation(&env.current_contract_address());
        env.storage()
            .persistent()
            .set(&DataKey::Unitroller, &unitroller);
        ImplementationAdopted { unitroller }.publish(&env);
    }

    pub fn get_unitroller(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Unitroller)
    }

    /// Current (liquidity, shortfall) in USD (1e6) across entered markets.
    pub fn account_liquidity(env: Env, user: Address) -> (u128, u128) {
        liquidity_internal(&env, &user, None, 0, 0)
    }

    /// Liquidity after a hypothetical borrow of `borrow_amount` from `market`.
    ///
    /// `market` is skipped during the cross-market walk and its debt is taken
    /// from `market_borrows` instead, so a market may call this mid-borrow
    /// without being called back.
    pub fn hypothetical_liquidity(
        env: Env,
        user: Address,
        market: Address,
        borrow_amount: u128,
        market_borrows: u128,
    ) -> (u128, u128) {
        liquidity_internal(&env, &user, Some(&market), borrow_amount, market_borrows)
    }
}

fn require_admin(env: &Env) {
    let admin: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Admin)
        .expect("admin not set");
    admin.require_auth();
}

fn price_of(env: &Env, oracle: &Address, market: &Address) -> u128 {
    PriceFeedClient::new(env, oracle)
        .get_underlying_price(market)
        .unwrap_or_else(|| panic!("price not set"))
}

fn liquidity_internal(
    env: &Env,
    user: &Address,
    exclude: Option<&Address>,
    borrow_amount: u128,
    market_borrows: u128,
) -> (u128, u128) {
    let storage = env.storage().persistent();
    let oracle: Option<Address> = storage.get(&DataKey::Oracle);
    let oracle = match oracle {
        Some(o) => o,
        // No oracle wired means risk checks are off.
        None => return (0, 0),
    };
    let entered: Vec<Address> = storage
        .get(&DataKey::UserMarkets(user.clone()))
        .unwrap_or(Vec::new(env));
    let mut collateral_usd: u128 = 0;
    let mut borrows_usd: u128 = 0;
    for m in entered.iter() {
        if exclude == Some(&m) {
            continue;
        }
        let client = MarketClient::new(env, &m);
        let pbal = client.balance_of(user);
        let debt = client.borrow_balance_stored(user);
        if pbal == 0 && debt == 0 {
            continue;
        }
        let price = price_of(env, &oracle, &m);
        if pbal > 0 {
            let rate = client.get_exchange_rate();
            let cf: u128 = storage.get(&DataKey::MarketCF(m.clone())).unwrap_or(0);
            let value = pbal.saturating_mul(rate) / SCALE_1E6;
            collateral_usd = collateral_usd
                .saturating_add(value.saturating_mul(cf) / SCALE_1E6 * price / SCALE_1E6);
        }
        if debt > 0 {
            borrows_usd = borrows_usd.saturating_add(debt.saturating_mul(price) / SCALE_1E6);
        }
    }
    if let Some(market) = exclude {
        let debt_total = market_borrows.saturating_add(borrow_amount);
        if debt_total > 0 {
            let price = price_of(env, &oracle, market);
            borrows_usd =
                borrows_usd.saturating_add(debt_total.saturating_mul(price) / SCALE_1E6);
        }
    }
    if collateral_usd >= borrows_usd {
        (collateral_usd - borrows_usd, 0)
    } else {
        (0, borrows_usd - collateral_usd)
    }
}
