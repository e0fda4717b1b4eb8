#![no_std]

mod constants;
mod contract;
mod events;
mod helpers;
mod storage;

pub use constants::*;
pub use contract::{LendingMarket, LendingMarketClient};
pub use storage::{BorrowSnapshot, DataKey};

#[cfg(test)]
mod test;
