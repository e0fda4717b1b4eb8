use soroban_sdk::{contractevent, Address};

/// Mirrors Compound's Mint event: emitted when pTokens are minted for a supplier.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    #[topic]
    pub minter: Address,
    pub mint_amount: u128,
    pub mint_tokens: u128,
}

/// Mirrors Compound's Redeem event: emitted when pTokens are burned for underlying.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redeem {
    #[topic]
    pub redeemer: Address,
    pub redeem_amount: u128,
    pub redeem_tokens: u128,
}

/// Mirrors Compound's Borrow event.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowEvent {
    #[topic]
    pub borrower: Address,
    pub borrow_amount: u128,
    pub account_borrows: u128,
    pub total_borrows: u128,
}

/// Mirrors Compound's RepayBorrow event.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepayBorrow {
    #[topic]
    pub payer: Address,
    #[topic]
    pub borrower: Address,
    pub repay_amount: u128,
    pub account_borrows: u128,
    pub total_borrows: u128,
}

/// Mirrors Compound's AccrueInterest event.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrueInterest {
    pub interest_accumulated: u128,
    pub borrow_index: u128,
    pub total_borrows: u128,
}

/// Mirrors Compound's NewComptroller event.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewComptroller {
    #[topic]
    pub comptroller: Address,
}

/// Mirrors Compound's NewMarketInterestRateModel event.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewInterestModel {
    #[topic]
    pub model: Address,
}
