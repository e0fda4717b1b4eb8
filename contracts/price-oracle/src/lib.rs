#![no_std]
use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, Env};

#[contracttype]
pub enum DataKey {
    Admin,
    Price(Address), // per-market underlying price, scaled 1e6
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceUpdated {
    #[topic]
    pub market: Address,
    pub price: u128,
}

/// Admin-set price feed. Prices are keyed by market address and quoted in
/// USD scaled 1e6, matching the rate scale used across the protocol.
#[contract]
pub struct PriceOracle;

#[contractimpl]
impl PriceOracle {
    pub fn initialize(env: Env, admin: Address) {
        if env
            .storage()
            .persistent()
            .get::<_, Address>(&DataKey::Admin)
            .is_some()
        {
            panic!("already initialized");
        }
        admin.require_auth();
        env.storage().persistent().set(&DataKey::Admin, &admin);
    }

    pub fn set_underlying_price(env: Env, market: Address, price_scaled: u128) {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set");
        admin.require_auth();
        env.storage()
            .persistent()
            .set(&DataKey::Price(market.clone()), &price_scaled);
        PriceUpdated {
            market,
            price: price_scaled,
        }
        .publish(&env);
    }

    pub fn get_underlying_price(env: Env, market: Address) -> Option<u128> {
        env.storage().persistent().get(&DataKey::Price(market))
    }
}
