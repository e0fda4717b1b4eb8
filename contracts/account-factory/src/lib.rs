#![no_std]

use soroban_sdk::{contractevent, Address, BytesN, Env};

mod diamond;
mod proxy_deployer;

pub use diamond::{DiamondFactory, DiamondFactoryClient};
pub use proxy_deployer::{ProxyDeployer, ProxyDeployerClient};

#[cfg(test)]
mod test;

pub(crate) const TTL_THRESHOLD: u32 = 100_000_000;
pub(crate) const TTL_EXTEND_TO: u32 = 200_000_000;

/// Account surface the factories need at creation and adoption time.
#[soroban_sdk::contractclient(name = "CreatedAccountClient")]
pub trait CreatedAccount {
    fn initialize(env: Env, owner: Address, router: Address, data_provider: Address);
    fn get_owner(env: Env) -> Address;
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountCreated {
    #[topic]
    pub owner: Address,
    pub account: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountAdopted {
    #[topic]
    pub owner: Address,
    pub account: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountWasmSet {
    pub hash: BytesN<32>,
}
