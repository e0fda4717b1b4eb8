use soroban_sdk::{
    contract, contractclient, contractimpl, token, Address, Env, String,
};

use crate::constants::*;
use crate::events::*;
use crate::helpers::*;
use crate::storage::*;

/// Yearly borrow rate source, scaled 1e6.
#[contractclient(name = "RateModelClient")]
pub trait RateModel {
    fn get_borrow_rate(env: Env, cash: u128, borrows: u128, reserves: u128) -> u128;
}

/// Risk engine consulted before a borrow leaves the market.
///
/// The calling market is excluded from the comptroller's cross-market walk
/// and reports its own stored debt through `market_borrows`, so the
/// comptroller never calls back into the market mid-invocation.
#[contractclient(name = "RiskEngineClient")]
pub trait RiskEngine {
    fn hypothetical_liquidity(
        env: Env,
        user: Address,
        market: Address,
        borrow_amount: u128,
        market_borrows: u128,
    ) -> (u128, u128);
}

#[contract]
pub struct LendingMarket;

#[contractimpl]
impl LendingMarket {
    /// Initialize the market over an underlying token.
    ///
    /// `rate_model` is optional: markets without a model accrue no interest.
    /// `initial_exchange_rate_scaled` (1e6) prices pTokens while supply is 0.
    pub fn initialize(
        env: Env,
        underlying: Address,
        rate_model: Option<Address>,
        initial_exchange_rate_scaled: u128,
        name: String,
        symbol: String,
        decimals: u32,
        admin: Address,
    ) {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Underlying) {
            panic!("already initialized");
        }
        admin.require_auth();
        if initial_exchange_rate_scaled == 0 {
            panic!("invalid exchange rate");
        }

        storage.set(&DataKey::Underlying, &underlying);
        storage.set(&DataKey::Admin, &admin);
        if let Some(model) = rate_model {
            storage.set(&DataKey::RateModel, &model);
        }
        storage.set(
            &DataKey::InitialExchangeRate,
            &initial_exchange_rate_scaled,
        );
        storage.set(&DataKey::TotalSupply, &0u128);
        storage.set(&DataKey::TotalBorrows, &0u128);
        storage.set(&DataKey::BorrowIndex, &INDEX_SCALE_1E18);
        storage.set(&DataKey::LastAccrual, &env.ledger().timestamp());
        storage.set(&DataKey::TokenName, &name);
        storage.set(&DataKey::TokenSymbol, &symbol);
        storage.set(&DataKey::TokenDecimals, &decimals);
        bump_core_ttl(&env);
    }

    /// Admin: attach the risk engine that gates borrows.
    pub fn set_comptroller(env: Env, comptroller: Address) {
        ensure_initialized(&env);
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set");
        admin.require_auth();
        // A zero-amount liquidity query is a no-op on a real risk engine
        // and traps on a wrong address.
        let engine = RiskEngineClient::new(&env, &comptroller);
        let me = env.current_contract_address();
        let _ = engine.hypothetical_liquidity(&me, &me, &0u128, &0u128);
        env.storage()
            .persistent()
            .set(&DataKey::Comptroller, &comptroller);
        NewComptroller { comptroller }.publish(&env);
    }

    /// Admin: swap the interest rate model.
    pub fn set_rate_model(env: Env, model: Address) {
        ensure_initialized(&env);
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set");
        admin.require_auth();
        Self::accrue_interest(env.clone());
        let candidate = RateModelClient::new(&env, &model);
        let rate = candidate.get_borrow_rate(&0u128, &0u128, &0u128);
        if rate > MAX_YEARLY_RATE_SCALED {
            panic!("invalid rate model");
        }
        env.storage().persistent().set(&DataKey::RateModel, &model);
        NewInterestModel { model }.publish(&env);
    }

    /// Accrue borrow interest since the last accrual.
    ///
    /// Interest is added to total borrows only; suppliers earn it through the
    /// exchange rate. The borrow index grows proportionally so stored
    /// snapshots stay consistent.
    pub fn accrue_interest(env: Env) {
        let underlying = ensure_initialized(&env);
        bump_borrow_state_ttl(&env);
        let storage = env.storage().persistent();
        let now = env.ledger().timestamp();
        let last: u64 = storage.get(&DataKey::LastAccrual).unwrap_or(now);
        if now <= last {
            return;
        }
        let model: Option<Address> = storage.get(&DataKey::RateModel);
        let model = match model {
            Some(m) => m,
            None => {
                storage.set(&DataKey::LastAccrual, &now);
                return;
            }
        };
        let total_borrows: u128 = storage.get(&DataKey::TotalBorrows).unwrap_or(0);
        if total_borrows == 0 {
            storage.set(&DataKey::LastAccrual, &now);
            return;
        }
        let cash = cash_balance(&env, &underlying);
        let rate = RateModelClient::new(&env, &model).get_borrow_rate(
            &cash,
            &total_borrows,
            &0u128,
        );
        let elapsed = (now - last) as u128;
        let interest = total_borrows
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(elapsed))
            .map(|v| v / (SECONDS_PER_YEAR * SCALE_1E6))
            .unwrap_or_else(|| panic!("interest overflow"));
        if interest == 0 {
            storage.set(&DataKey::LastAccrual, &now);
            return;
        }
        let new_borrows = total_borrows + interest;
        let index: u128 = storage
            .get(&DataKey::BorrowIndex)
            .unwrap_or(INDEX_SCALE_1E18);
        let new_index = index + index * interest / total_borrows;
        storage.set(&DataKey::TotalBorrows, &new_borrows);
        storage.set(&DataKey::BorrowIndex, &new_index);
        storage.set(&DataKey::LastAccrual, &now);
        AccrueInterest {
            interest_accumulated: interest,
            borrow_index: new_index,
            total_borrows: new_borrows,
        }
        .publish(&env);
    }

    /// Supply underlying and receive pTokens at the current exchange rate.
    pub fn mint(env: Env, user: Address, amount: u128) {
        let underlying = ensure_initialized(&env);
        Self::accrue_interest(env.clone());
        user.require_auth();
        if amount == 0 {
            panic!("bad amount");
        }
        let rate = Self::get_exchange_rate(env.clone());
        let tokens = amount * SCALE_1E6 / rate;
        if tokens == 0 {
            panic!("amount below minimum");
        }
        token::Client::new(&env, &underlying).transfer(
            &user,
            &env.current_contract_address(),
            &to_i128(amount),
        );
        let storage = env.storage().persistent();
        let balance = ptoken_balance(&env, &user);
        storage.set(&DataKey::Balance(user.clone()), &(balance + tokens));
        let supply = total_ptokens_supply(&env);
        storage.set(&DataKey::TotalSupply, &(supply + tokens));
        Mint {
            minter: user,
            mint_amount: amount,
            mint_tokens: tokens,
        }
        .publish(&env);
    }

    /// Burn pTokens and send the holder an exact amount of underlying.
    pub fn redeem_underlying(env: Env, user: Address, amount: u128) {
        let underlying = ensure_initialized(&env);
        Self::accrue_interest(env.clone());
        user.require_auth();
        if amount == 0 {
            panic!("bad amount");
        }
        let rate = Self::get_exchange_rate(env.clone());
        // Round pTokens up so the market never gives out more than was backed.
        let tokens = (amount * SCALE_1E6 + rate - 1) / rate;
        let balance = ptoken_balance(&env, &user);
        if tokens > balance {
            panic!("insufficient ptokens");
        }
        if amount > cash_balance(&env, &underlying) {
            panic!("not enough liquidity");
        }
        let storage = env.storage().persistent();
        storage.set(&DataKey::Balance(user.clone()), &(balance - tokens));
        let supply = total_ptokens_supply(&env);
        storage.set(&DataKey::TotalSupply, &(supply - tokens));
        token::Client::new(&env, &underlying).transfer(
            &env.current_contract_address(),
            &user,
            &to_i128(amount),
        );
        Redeem {
            redeemer: user,
            redeem_amount: amount,
            redeem_tokens: tokens,
        }
        .publish(&env);
    }

    /// Borrow underlying against collateral held across the comptroller's markets.
    pub fn borrow(env: Env, user: Address, amount: u128) {
        let underlying = ensure_initialized(&env);
        Self::accrue_interest(env.clone());
        user.require_auth();
        if amount == 0 {
            panic!("bad amount");
        }
        let storage = env.storage().persistent();
        let debt_prior = Self::borrow_balance_stored(env.clone(), user.clone());
        if let Some(comptroller) = storage.get::<_, Address>(&DataKey::Comptroller) {
            let (_, shortfall) = RiskEngineClient::new(&env, &comptroller)
                .hypothetical_liquidity(
                    &user,
                    &env.current_contract_address(),
                    &amount,
                    &debt_prior,
                );
            if shortfall > 0 {
                panic!("insufficient collateral");
            }
        }
        if amount > cash_balance(&env, &underlying) {
            panic!("not enough liquidity");
        }
        let index: u128 = storage
            .get(&DataKey::BorrowIndex)
            .unwrap_or(INDEX_SCALE_1E18);
        let account_borrows = debt_prior + amount;
        storage.set(
            &DataKey::BorrowSnapshots(user.clone()),
            &BorrowSnapshot {
                principal: account_borrows,
                interest_index: index,
            },
        );
        bump_borrow_snapshot_ttl(&env, &user);
        let total_borrows: u128 = storage.get(&DataKey::TotalBorrows).unwrap_or(0) + amount;
        storage.set(&DataKey::TotalBorrows, &total_borrows);
        token::Client::new(&env, &underlying).transfer(
            &env.current_contract_address(),
            &user,
            &to_i128(amount),
        );
        BorrowEvent {
            borrower: user,
            borrow_amount: amount,
            account_borrows,
            total_borrows,
        }
        .publish(&env);
    }

    /// Repay a borrow on behalf of `user`. Repayment above the outstanding
    /// debt is capped at the debt.
    pub fn repay_borrow(env: Env, user: Address, amount: u128) {
        let underlying = ensure_initialized(&env);
        Self::accrue_interest(env.clone());
        user.require_auth();
        if amount == 0 {
            return;
        }
        let debt = Self::borrow_balance_stored(env.clone(), user.clone());
        if debt == 0 {
            return;
        }
        let pay = if amount > debt { debt } else { amount };
        token::Client::new(&env, &underlying).transfer(
            &user,
            &env.current_contract_address(),
            &to_i128(pay),
        );
        let storage = env.storage().persistent();
        let index: u128 = storage
            .get(&DataKey::BorrowIndex)
            .unwrap_or(INDEX_SCALE_1E18);
        let account_borrows = debt - pay;
        storage.set(
            &DataKey::BorrowSnapshots(user.clone()),
            &BorrowSnapshot {
                principal: account_borrows,
                interest_index: index,
            },
        );
        bump_borrow_snapshot_ttl(&env, &user);
        let prior: u128 = storage.get(&DataKey::TotalBorrows).unwrap_or(0);
        let total_borrows = if pay > prior { 0 } else { prior - pay };
        storage.set(&DataKey::TotalBorrows, &total_borrows);
        RepayBorrow {
            payer: user.clone(),
            borrower: user,
            repay_amount: pay,
            account_borrows,
            total_borrows,
        }
        .publish(&env);
    }

    // ---- Views ----

    pub fn balance_of(env: Env, user: Address) -> u128 {
        ptoken_balance(&env, &user)
    }

    pub fn total_supply(env: Env) -> u128 {
        total_ptokens_supply(&env)
    }

    /// Borrow balance at the stored index, without accruing.
    pub fn borrow_balance_stored(env: Env, user: Address) -> u128 {
        let storage = env.storage().persistent();
        let snapshot: Option<BorrowSnapshot> =
            storage.get(&DataKey::BorrowSnapshots(user));
        match snapshot {
            Some(s) if s.principal > 0 => {
                let index: u128 = storage
                    .get(&DataKey::BorrowIndex)
                    .unwrap_or(INDEX_SCALE_1E18);
                s.principal * index / s.interest_index
            }
            _ => 0,
        }
    }

    /// Underlying per pToken, scaled 1e6. Falls back to the initial rate
    /// while no pTokens exist.
    pub fn get_exchange_rate(env: Env) -> u128 {
        let supply = total_ptokens_supply(&env);
        let storage = env.storage().persistent();
        if supply == 0 {
            return storage
                .get(&DataKey::InitialExchangeRate)
                .unwrap_or(SCALE_1E6);
        }
        let underlying: Address = storage
            .get(&DataKey::Underlying)
            .expect("market not initialized");
        let total_borrows: u128 = storage.get(&DataKey::TotalBorrows).unwrap_or(0);
        let total_underlying = cash_balance(&env, &underlying) + total_borrows;
        total_underlying * SCALE_1E6 / supply
    }

    pub fn get_underlying(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Underlying)
            .expect("market not initialized")
    }

    pub fn get_cash(env: Env) -> u128 {
        let underlying = ensure_initialized(&env);
        cash_balance(&env, &underlying)
    }

    pub fn get_total_borrows(env: Env) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalBorrows)
            .unwrap_or(0)
    }

    pub fn get_borrow_index(env: Env) -> u128 {
        env.storage()
            .persistent()
            .get(&DataKey::BorrowIndex)
            .unwrap_or(INDEX_SCALE_1E18)
    }

    pub fn get_comptroller(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Comptroller)
    }

    pub fn get_rate_model(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::RateModel)
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set")
    }

    pub fn name(env: Env) -> String {
        env.storage()
            .persistent()
            .get(&DataKey::TokenName)
            .expect("market not initialized")
    }

    pub fn symbol(env: Env) -> String {
        env.storage()
            .persistent()
            .get(&DataKey::TokenSymbol)
            .expect("market not initialized")
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::TokenDecimals)
            .expect("market not initialized")
    }
}
