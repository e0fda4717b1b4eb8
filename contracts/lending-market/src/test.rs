#![cfg(test)]

use super::*;
use crate::contract::{LendingMarket, LendingMarketClient};
use rate_model::{FixedRateModel, FixedRateModelClient};
use soroban_sdk::testutils::Ledger;
use soroban_sdk::{contract, contractimpl, contracttype};
use soroban_sdk::{
    testutils::Address as _,
    token, Address, Env, String,
};

fn create_test_token<'a>(
    env: &'a Env,
    admin: &'a Address,
) -> (Address, token::Client<'a>, token::StellarAssetClient<'a>) {
    let contract_address = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    (
        contract_address.clone(),
        token::Client::new(env, &contract_address),
        token::StellarAssetClient::new(env, &contract_address),
    )
}

#[contract]
pub struct MockRiskEngine;

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Shortfall,
}

#[contractimpl]
impl MockRiskEngine {
    pub fn set_shortfall(env: Env, shortfall: u128) {
        env.storage().persistent().set(&MockKey::Shortfall, &shortfall);
    }

    pub fn hypothetical_liquidity(
        env: Env,
        _user: Address,
        _market: Address,
        borrow_amount: u128,
        _market_borrows: u128,
    ) -> (u128, u128) {
        if borrow_amount == 0 {
            return (0, 0);
        }
        let shortfall: u128 = env
            .storage()
            .persistent()
            .get(&MockKey::Shortfall)
            .unwrap_or(0);
        (0, shortfall)
    }
}

fn setup_market<'a>(
    env: &'a Env,
    admin: &Address,
    underlying: &Address,
    rate_model: Option<Address>,
) -> LendingMarketClient<'a> {
    let market = LendingMarketClient::new(env, &env.register(LendingMarket, ()));
    market.initialize(
        underlying,
        &rate_model,
        &SCALE_1E6,
        &String::from_str(env, "Receipt USD"),
        &String::from_str(env, "rUSD"),
        &6u32,
        admin,
    );
    market
}

#[test]
fn mint_and_redeem_round_trip() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (token_addr, token_client, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);

    token_admin.mint(&user, &1_000i128);
    market.mint(&user, &400u128);
    assert_eq!(market.balance_of(&user), 400);
    assert_eq!(market.total_supply(), 400);
    assert_eq!(market.get_exchange_rate(), SCALE_1E6);
    assert_eq!(token_client.balance(&user), 600);

    market.redeem_underlying(&user, &150u128);
    assert_eq!(market.balance_of(&user), 250);
    assert_eq!(token_client.balance(&user), 750);
    assert_eq!(market.get_cash(), 250);
}

#[test]
#[should_panic(expected = "insufficient ptokens")]
fn redeem_more_than_supplied_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let (token_addr, _, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);

    token_admin.mint(&user, &500i128);
    market.mint(&user, &200u128);
    market.redeem_underlying(&user, &201u128);
}

#[test]
#[should_panic(expected = "not enough liquidity")]
fn redeem_when_cash_is_lent_out_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let supplier = Address::generate(&env);
    let borrower = Address::generate(&env);
    let (token_addr, _, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);

    token_admin.mint(&supplier, &1_000i128);
    market.mint(&supplier, &1_000u128);
    market.borrow(&borrower, &600u128);
    market.redeem_underlying(&supplier, &500u128);
}

#[test]
fn borrow_and_repay_without_interest() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let supplier = Address::generate(&env);
    let borrower = Address::generate(&env);
    let (token_addr, token_client, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);

    token_admin.mint(&supplier, &1_000i128);
    market.mint(&supplier, &1_000u128);
    market.borrow(&borrower, &300u128);
    assert_eq!(market.borrow_balance_stored(&borrower), 300);
    assert_eq!(market.get_total_borrows(), 300);
    assert_eq!(token_client.balance(&borrower), 300);

    market.repay_borrow(&borrower, &120u128);
    assert_eq!(market.borrow_balance_stored(&borrower), 180);
    assert_eq!(market.get_total_borrows(), 180);

    // Overpayment is capped at the outstanding debt.
    token_admin.mint(&borrower, &100i128);
    market.repay_borrow(&borrower, &500u128);
    assert_eq!(market.borrow_balance_stored(&borrower), 0);
    assert_eq!(market.get_total_borrows(), 0);
    assert_eq!(token_client.balance(&borrower), 100);
}

#[test]
fn interest_accrues_through_index_and_exchange_rate() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let supplier = Address::generate(&env);
    let borrower = Address::generate(&env);
    let (token_addr, _, token_admin) = create_test_token(&env, &admin);
    let model = FixedRateModelClient::new(&env, &env.register(FixedRateModel, ()));
    model.initialize(&100_000u128); // 10% yearly
    let market = setup_market(&env, &admin, &token_addr, Some(model.address.clone()));

    token_admin.mint(&supplier, &1_000i128);
    market.mint(&supplier, &1_000u128);
    market.borrow(&borrower, &500u128);

    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + SECONDS_PER_YEAR as u64);
    market.accrue_interest();

    // 500 borrowed at 10% for one year adds 50 of interest.
    assert_eq!(market.get_total_borrows(), 550);
    assert_eq!(market.borrow_balance_stored(&borrower), 550);
    assert_eq!(
        market.get_borrow_index(),
        INDEX_SCALE_1E18 + INDEX_SCALE_1E18 / 10
    );
    // Suppliers see the interest through the exchange rate: 1050 underlying
    // backing 1000 pTokens.
    assert_eq!(market.get_exchange_rate(), 1_050_000);

    token_admin.mint(&borrower, &50i128);
    market.repay_borrow(&borrower, &550u128);
    assert_eq!(market.borrow_balance_stored(&borrower), 0);
    assert_eq!(market.get_total_borrows(), 0);
    assert_eq!(market.get_exchange_rate(), 1_050_000);
}

#[test]
fn comptroller_gate_allows_borrow_without_shortfall() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let supplier = Address::generate(&env);
    let borrower = Address::generate(&env);
    let (token_addr, _, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);
    let engine = MockRiskEngineClient::new(&env, &env.register(MockRiskEngine, ()));
    market.set_comptroller(&engine.address);
    assert_eq!(market.get_comptroller(), Some(engine.address.clone()));

    token_admin.mint(&supplier, &1_000i128);
    market.mint(&supplier, &1_000u128);
    market.borrow(&borrower, &250u128);
    assert_eq!(market.borrow_balance_stored(&borrower), 250);
}

#[test]
#[should_panic(expected = "insufficient collateral")]
fn comptroller_gate_blocks_shortfall_borrow() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let supplier = Address::generate(&env);
    let borrower = Address::generate(&env);
    let (token_addr, _, token_admin) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);
    let engine = MockRiskEngineClient::new(&env, &env.register(MockRiskEngine, ()));
    market.set_comptroller(&engine.address);
    engine.set_shortfall(&1u128);

    token_admin.mint(&supplier, &1_000i128);
    market.mint(&supplier, &1_000u128);
    market.borrow(&borrower, &250u128);
}

#[test]
#[should_panic(expected = "already initialized")]
fn double_initialize_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let (token_addr, _, _) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);
    market.initialize(
        &token_addr,
        &None,
        &SCALE_1E6,
        &String::from_str(&env, "Receipt USD"),
        &String::from_str(&env, "rUSD"),
        &6u32,
        &admin,
    );
}

#[test]
#[should_panic(expected = "bad amount")]
fn mint_zero_panics() {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let (token_addr, _, _) = create_test_token(&env, &admin);
    let market = setup_market(&env, &admin, &token_addr, None);
    market.mint(&admin, &0u128);
}
