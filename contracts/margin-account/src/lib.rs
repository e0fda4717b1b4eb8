#![no_std]
use soroban_sdk::{Address, Env, Symbol};

mod account;
mod provider;
mod proxy;

pub use account::{MarginAccount, MarginAccountClient};
pub use provider::{ImplementationProvider, ImplementationProviderClient};
pub use proxy::{MarginAccountProxy, MarginAccountProxyClient};


/// Selector routing table of a diamond deployment.
#[soroban_sdk::contractclient(name = "FacetRouterClient")]
pub trait FacetRouter {
    fn facet_address(env: Env, selector: Symbol) -> Option<Address>;
}

/// Implementation lookup of a proxy deployment.
#[soroban_sdk::contractclient(name = "ImplementationSourceClient")]
pub trait ImplementationSource {
    fn get_implementation(env: Env, selector: Symbol) -> Option<Address>;
    fn get_default_implementation(env: Env) -> Address;
}
