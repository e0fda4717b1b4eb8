#![cfg(test)]

use super::*;
use lending_market::{LendingMarket, LendingMarketClient};
use price_oracle::{PriceOracle, PriceOracleClient};
use soroban_sdk::{
    testutils::Address as _,
    token, vec, Address, Env, String, Symbol, TryFromVal, Val,
};

fn register_comptroller<'a>(env: &'a Env, admin: &Address) -> ComptrollerClient<'a> {
    let client = ComptrollerClient::new(env, &env.register(Comptroller, ()));
    client.initialize(admin);
    client
}

fn register_market<'a>(env: &'a Env, admin: &Address) -> (Address, LendingMarketClient<'a>) {
    let underlying = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let market = LendingMarketClient::new(env, &env.register(LendingMarket, ()));
    market.initialize(
        &underlying,
        &None,
        &SCALE_1E6,
        &String::from_str(env, "Receipt"),
        &String::from_str(env, "rTOK"),
        &6u32,
        admin,
    );
    (underlying, market)
}

#[test]
fn markets_list_in_insertion_order() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);

    let m0 = Address::generate(&env);
    let m1 = Address::generate(&env);
    let m2 = Address::generate(&env);
    comptroller.support_market(&m0);
    comptroller.support_market(&m1);
    comptroller.support_market(&m2);

    let all = comptroller.get_all_markets();
    assert_eq!(all, vec![&env, m0.clone(), m1.clone(), m2.clone()]);
    assert!(comptroller.is_listed(&m1));
}

#[test]
#[should_panic(expected = "already listed")]
fn double_listing_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);
    let market = Address::generate(&env);
    comptroller.support_market(&market);
    comptroller.support_market(&market);
}

#[test]
#[should_panic(expected = "market not listed")]
fn collateral_factor_requires_listing() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);
    comptroller.set_collateral_factor(&Address::generate(&env), &500_000u128);
}

#[test]
#[should_panic(expected = "market not listed")]
fn entering_unlisted_market_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);
    comptroller.enter_markets(&user, &vec![&env, Address::generate(&env)]);
}

#[test]
fn defaults_and_policy_setters() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);

    assert_eq!(comptroller.get_close_factor(), 500_000);
    assert_eq!(comptroller.get_liquidation_incentive(), SCALE_1E6);

    comptroller.set_close_factor(&600_000u128);
    comptroller.set_liquidation_incentive(&1_080_000u128);
    assert_eq!(comptroller.get_close_factor(), 600_000);
    assert_eq!(comptroller.get_liquidation_incentive(), 1_080_000);

    let reward = Address::generate(&env);
    comptroller.set_reward_token(&reward);
    comptroller.set_reward_rate(&250u128);
    assert_eq!(comptroller.get_reward_token(), Some(reward));
    assert_eq!(comptroller.get_reward_rate(), 250);
}

#[test]
fn liquidity_counts_collateral_and_hypothetical_borrow() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);
    let oracle = PriceOracleClient::new(&env, &env.register(PriceOracle, ()));
    oracle.initialize(&admin);
    comptroller.set_price_oracle(&oracle.address);

    let (underlying, market) = register_market(&env, &admin);
    let other_market = Address::generate(&env);
    comptroller.support_market(&market.address);
    comptroller.support_market(&other_market);
    comptroller.set_collateral_factor(&market.address, &500_000u128);
    oracle.set_underlying_price(&market.address, &SCALE_1E6);
    oracle.set_underlying_price(&other_market, &SCALE_1E6);

    token::StellarAssetClient::new(&env, &underlying).mint(&user, &1_000i128);
    market.mint(&user, &1_000u128);
    comptroller.enter_markets(&user, &vec![&env, market.address.clone()]);

    // 1000 supplied at 50% collateral factor is 500 USD of borrow power.
    assert_eq!(comptroller.account_liquidity(&user), (500, 0));
    assert_eq!(
        comptroller.hypothetical_liquidity(&user, &other_market, &300u128, &0u128),
        (200, 0)
    );
    assert_eq!(
        comptroller.hypothetical_liquidity(&user, &other_market, &600u128, &0u128),
        (0, 100)
    );
    // The queried market reports its own debt instead of being called back.
    assert_eq!(
        comptroller.hypothetical_liquidity(&user, &other_market, &100u128, &350u128),
        (50, 0)
    );
}

#[test]
fn unitroller_handshake_and_forwarding() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let comptroller = register_comptroller(&env, &admin);
    let unitroller = UnitrollerClient::new(&env, &env.register(Unitroller, ()));
    unitroller.initialize(&admin);

    unitroller.set_pending_implementation(&comptroller.address);
    assert_eq!(
        unitroller.get_pending_implementation(),
        Some(comptroller.address.clone())
    );
    comptroller.become_implementation(&unitroller.address);
    assert_eq!(
        unitroller.get_implementation(),
        Some(comptroller.address.clone())
    );
    assert_eq!(unitroller.get_pending_implementation(), None);
    assert_eq!(comptroller.get_unitroller(), Some(unitroller.address.clone()));

    let raw: Val = unitroller.forward(
        &Symbol::new(&env, "get_close_factor"),
        &soroban_sdk::Vec::<Val>::new(&env),
    );
    assert_eq!(u128::try_from_val(&env, &raw).unwrap(), 500_000);
}

#[test]
#[should_panic(expected = "not pending implementation")]
fn accept_without_staging_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let unitroller = UnitrollerClient::new(&env, &env.register(Unitroller, ()));
    unitroller.initialize(&admin);
    unitroller.accept_implementation(&Address::generate(&env));
}

#[test]
#[should_panic(expected = "no implementation")]
fn forward_without_implementation_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let unitroller = UnitrollerClient::new(&env, &env.register(Unitroller, ()));
    unitroller.initialize(&admin);
    let _: Val = unitroller.forward(
        &Symbol::new(&env, "get_close_factor"),
        &soroban_sdk::Vec::<Val>::new(&env),
    );
}
