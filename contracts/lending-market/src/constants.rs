pub const SCALE_1E6: u128 = 1_000_000u128;
pub const INDEX_SCALE_1E18: u128 = 1_000_000_000_000_000_000u128; // 1e18
pub const SECONDS_PER_YEAR: u128 = 31_536_000u128;
pub const MAX_YEARLY_RATE_SCALED: u128 = 10_000_000u128; // 1000% APY cap to prevent overflow

pub const TTL_THRESHOLD: u32 = 100_000_000;
pub const TTL_EXTEND_TO: u32 = 200_000_000;
