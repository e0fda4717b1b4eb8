use soroban_sdk::{contracttype, Address};

// Storage key types for the market
#[contracttype]
pub enum DataKey {
    Underlying,            // Address of the underlying token
    Admin,                 // Address
    Comptroller,           // Address (optional)
    RateModel,             // Address (optional)
    InitialExchangeRate,   // u128, scaled 1e6, used while total supply is 0
    TotalSupply,           // u128, pTokens outstanding
    Balance(Address),      // u128, pToken balance per holder
    TotalBorrows,          // u128, underlying owed across all borrowers
    BorrowIndex,           // u128 (scaled 1e18)
    BorrowSnapshots(Address), // BorrowSnapshot per borrower
    LastAccrual,           // u64
    TokenName,             // String
    TokenSymbol,           // String
    TokenDecimals,         // u32
}

/// Compound-style borrow snapshot: principal at the index it was last touched.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowSnapshot {
    pub principal: u128,
    pub interest_index: u128,
}
