#![no_std]

mod descriptor;
mod factory;
mod pool;
mod position_manager;
mod router;
mod wrapped_native;

pub use descriptor::{PositionDescriptor, PositionDescriptorClient};
pub use factory::{AmmFactory, AmmFactoryClient};
pub use pool::{AmmPool, AmmPoolClient};
pub use position_manager::{MintParams, PositionManager, PositionManagerClient};
pub use router::{
    ExactInputSingleParams, ExactOutputSingleParams, SwapRouter, SwapRouterClient,
};
pub use wrapped_native::{WrappedNative, WrappedNativeClient};

/// Uniswap-style fee tiers, in hundredths of a basis point.
pub const FEE_LOW: u32 = 500;
pub const FEE_MEDIUM: u32 = 3000;
pub const FEE_HIGH: u32 = 10000;
