use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, symbol_short, token,
    token::TokenInterface, Address, Env, MuxedAddress, String,
};

#[contracttype]
pub enum WrapKey {
    Native,
    Balance(Address),
    Allowance(Address, Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Wrapped {
    #[topic]
    pub account: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unwrapped {
    #[topic]
    pub account: Address,
    pub amount: i128,
}

/// SEP-41 wrapper over the chain's native asset, so pools and markets can
/// treat it like any other token.
#[contract]
pub struct WrappedNative;

#[contractimpl]
impl WrappedNative {
    pub fn initialize(env: Env, native: Address) {
        let storage = env.storage().instance();
        if storage.has(&WrapKey::Native) {
            panic!("already initialized");
        }
        storage.set(&WrapKey::Native, &native);
    }

    pub fn native(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&WrapKey::Native)
            .expect("wrapper not initialized")
    }

    /// Deposit native and mint the same amount of wrapped balance.
    pub fn wrap(env: Env, account: Address, amount: i128) {
        account.require_auth();
        if amount <= 0 {
            panic!("bad amount");
        }
        let native = Self::native(env.clone());
        token::Client::new(&env, &native).transfer(
            &account,
            &env.current_contract_address(),
            &amount,
        );
        credit(&env, &account, amount);
        Wrapped { account, amount }.publish(&env);
    }

    /// Burn wrapped balance and release the native asset.
    pub fn unwrap(env: Env, account: Address, amount: i128) {
        account.require_auth();
        if amount <= 0 {
            panic!("bad amount");
        }
        debit(&env, &account, amount);
        let native = Self::native(env.clone());
        token::Client::new(&env, &native).transfer(
            &env.current_contract_address(),
            &account,
            &amount,
        );
        Unwrapped { account, amount }.publish(&env);
    }
}

#[contractimpl]
impl TokenInterface for WrappedNative {
    fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        let allowance: Option<AllowanceValue> = env
            .storage()
            .persistent()
            .get(&WrapKey::Allowance(from, spender));
        match allowance {
            Some(a) if a.expiration_ledger >= env.ledger().sequence() => a.amount,
            _ => 0,
        }
    }

    fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        if amount < 0 {
            panic!("bad amount");
        }
        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            panic!("expiration in the past");
        }
        env.storage().persistent().set(
            &WrapKey::Allowance(from.clone(), spender.clone()),
            &AllowanceValue {
                amount,
                expiration_ledger,
            },
        );
        env.events().publish(
            (symbol_short!("approve"), from, spender),
            (amount, expiration_ledger),
        );
    }

    fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&WrapKey::Balance(id))
            .unwrap_or(0)
    }

    fn transfer(env: Env, from: Address, to: MuxedAddress, amount: i128) {
        from.require_auth();
        if amount < 0 {
            panic!("bad amount");
        }
        let to = to.address();
        debit(&env, &from, amount);
        credit(&env, &to, amount);
        env.events()
            .publish((symbol_short!("transfer"), from, to), amount);
    }

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        spend_allowance(&env, &from, &spender, amount);
        debit(&env, &from, amount);
        credit(&env, &to, amount);
        env.events()
            .publish((symbol_short!("transfer"), from, to), amount);
    }

    fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        debit(&env, &from, amount);
        env.events().publish((symbol_short!("burn"), from), amount);
    }

    fn burn_from(env: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        spend_allowance(&env, &from, &spender, amount);
        debit(&env, &from, amount);
        env.events().publish((symbol_short!("burn"), from), amount);
    }

    fn decimals(_env: Env) -> u32 {
        7
    }

    fn name(env: Env) -> String {
        String::from_str(&env, "Wrapped Native")
    }

    fn symbol(env: Env) -> String {
        String::from_str(&env, "wNATIVE")
    }
}

fn credit(env: &Env, account: &Address, amount: i128) {
    let balance: i128 = env
        .storage()
        .persistent()
        .get(&WrapKey::Balance(account.clone()))
        .unwrap_or(0);
    env.storage()
        .persistent()
        .set(&WrapKey::Balance(account.clone()), &(balance + amount));
}

fn debit(env: &Env, account: &Address, amount: i128) {
    let balance: i128 = env
        .storage()
        .persistent()
        .get(&WrapKey::Balance(account.clone()))
        .unwrap_or(0);
    if balance < amount {
        panic!("insufficient balance");
    }
    env.storage()
        .persistent()
        .set(&WrapKey::Balance(account.clone()), &(balance - amount));
}

fn spend_allowance(env: &Env, from: &Address, spender: &Address, amount: i128) {
    let key = WrapKey::Allowance(from.clone(), spender.clone());
    let allowance: AllowanceValue = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        });
    let live = if allowance.expiration_ledger >= env.ledger().sequence() {
        allowance.amount
    } else {
        0
    };
    if live < amount {
        panic!("insufficient allowance");
    }
    env.storage().persistent().set(
        &key,
        &AllowanceValue {
            amount: live - amount,
            expiration_ledger: allowance.expiration_ledger,
        },
    );
}
