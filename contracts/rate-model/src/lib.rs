#![no_std]
use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, BytesN, Env};

pub const SCALE_1E6: u128 = 1_000_000u128;
const TTL_THRESHOLD: u32 = 100_000_000;
const TTL_EXTEND_TO: u32 = 200_000_000;

/// Flat-curve model: one yearly borrow rate, fixed at deployment. One instance
/// is deployed per market so each market can carry its own rate knob.
#[contracttype]
pub enum FixedKey {
    BorrowRatePerYear, // u128 scaled 1e6
}

#[contract]
pub struct FixedRateModel;

#[contractimpl]
impl FixedRateModel {
    pub fn initialize(env: Env, borrow_rate_scaled: u128) {
        if env
            .storage()
            .persistent()
            .get::<_, u128>(&FixedKey::BorrowRatePerYear)
            .is_some()
        {
            panic!("already initialized");
        }
        if borrow_rate_scaled > 10_000_000u128 {
            panic!("invalid rate params");
        }
        env.storage()
            .persistent()
            .set(&FixedKey::BorrowRatePerYear, &borrow_rate_scaled);
    }

    pub fn get_borrow_rate(env: Env, _cash: u128, _borrows: u128, _reserves: u128) -> u128 {
        env.storage()
            .persistent()
            .get(&FixedKey::BorrowRatePerYear)
            .expect("model not initialized")
    }

    pub fn get_supply_rate(
        env: Env,
        cash: u128,
        borrows: u128,
        reserves: u128,
        reserve_factor: u128,
    ) -> u128 {
        let borrow_rate = Self::get_borrow_rate(env, cash, borrows, reserves);
        let one_minus_rf = SCALE_1E6.saturating_sub(reserve_factor);
        let rate_to_pool = borrow_rate.saturating_mul(one_minus_rf) / SCALE_1E6;
        utilization(cash, borrows, reserves).saturating_mul(rate_to_pool) / SCALE_1E6
    }
}

/// Kinked two-slope curve, Compound's JumpRateModel shape. The whole curve is
/// one storage value so a governance update swaps it atomically.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JumpCurve {
    pub base_rate: u128,  // yearly rate at zero utilization, scaled 1e6
    pub slope: u128,      // rate added per unit of utilization below the kink
    pub jump_slope: u128, // steeper slope applied above the kink
    pub kink: u128,       // utilization where the jump slope takes over
}

#[contracttype]
pub enum JumpKey {
    Curve, // JumpCurve
    Admin, // Address
}

#[contract]
pub struct JumpRateModel;

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurveSet {
    pub base_rate: u128,
    pub slope: u128,
    pub jump_slope: u128,
    pub kink: u128,
}

#[contractimpl]
impl JumpRateModel {
    pub fn initialize(env: Env, admin: Address, curve: JumpCurve) {
        if env
            .storage()
            .persistent()
            .get::<_, Address>(&JumpKey::Admin)
            .is_some()
        {
            panic!("already initialized");
        }
        validate_curve(&curve);
        admin.require_auth();
        env.storage().persistent().set(&JumpKey::Admin, &admin);
        store_curve(&env, &curve);
    }

    /// Admin: replace the curve. Markets pick up the new rates at their next
    /// accrual.
    pub fn update_curve(env: Env, admin: Address, curve: JumpCurve) {
        require_admin(&env, &admin);
        validate_curve(&curve);
        store_curve(&env, &curve);
    }

    pub fn get_curve(env: Env) -> JumpCurve {
        ensure_initialized(&env);
        env.storage()
            .persistent()
            .get(&JumpKey::Curve)
            .expect("model not initialized")
    }

    pub fn get_borrow_rate(env: Env, cash: u128, borrows: u128, reserves: u128) -> u128 {
        let curve = Self::get_curve(env.clone());
        bump_ttl(&env);
        kinked_rate(&curve, utilization(cash, borrows, reserves))
    }

    pub fn get_supply_rate(
        env: Env,
        cash: u128,
        borrows: u128,
        reserves: u128,
        reserve_factor: u128,
    ) -> u128 {
        let one_minus_rf = SCALE_1E6.saturating_sub(reserve_factor);
        let borrow_rate = Self::get_borrow_rate(env, cash, borrows, reserves);
        let rate_to_pool = borrow_rate.saturating_mul(one_minus_rf) / SCALE_1E6;
        utilization(cash, borrows, reserves).saturating_mul(rate_to_pool) / SCALE_1E6
    }

    pub fn upgrade_wasm(env: Env, admin: Address, new_wasm_hash: BytesN<32>) {
        require_admin(&env, &admin);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }
}

fn kinked_rate(curve: &JumpCurve, util: u128) -> u128 {
    let capped = util.min(curve.kink);
    let mut rate = curve
        .base_rate
        .saturating_add(capped.saturating_mul(curve.slope) / SCALE_1E6);
    let excess = util.saturating_sub(curve.kink);
    if excess > 0 {
        rate = rate.saturating_add(excess.saturating_mul(curve.jump_slope) / SCALE_1E6);
    }
    rate
}

fn validate_curve(curve: &JumpCurve) {
    if curve.kink > SCALE_1E6 {
        panic!("invalid kink");
    }
    if curve.slope > 10_000_000u128 || curve.jump_slope > 10_000_000u128 {
        panic!("invalid rate params");
    }
}

fn store_curve(env: &Env, curve: &JumpCurve) {
    env.storage().persistent().set(&JumpKey::Curve, curve);
    bump_ttl(env);
    CurveSet {
        base_rate: curve.base_rate,
        slope: curve.slope,
        jump_slope: curve.jump_slope,
        kink: curve.kink,
    }
    .publish(env);
}

fn utilization(cash: u128, borrows: u128, reserves: u128) -> u128 {
    if borrows == 0 {
        return 0;
    }
    let denom = cash.saturating_add(borrows).saturating_sub(reserves);
    if denom == 0 {
        return 0;
    }
    borrows.saturating_mul(SCALE_1E6) / denom
}

fn ensure_initialized(env: &Env) {
    if env
        .storage()
        .persistent()
        .get::<_, Address>(&JumpKey::Admin)
        .is_none()
    {
        panic!("model not initialized");
    }
}

fn require_admin(env: &Env, admin: &Address) {
    let stored: Address = env
        .storage()
        .persistent()
        .get(&JumpKey::Admin)
        .expect("admin not set");
    bump_ttl(env);
    if stored != *admin {
        panic!("not admin");
    }
    admin.require_auth();
}

fn bump_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&JumpKey::Admin) {
        persistent.extend_ttl(&JumpKey::Admin, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&JumpKey::Curve) {
        persistent.extend_ttl(&JumpKey::Curve, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
