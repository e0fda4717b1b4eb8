use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String};

#[contracttype]
pub enum DescriptorKey {
    WrappedNative,
    NativeLabel,
}

/// Labels positions minted through the manager. Kept as wiring metadata so
/// the manager's deploy surface matches its mainnet counterpart.
#[contract]
pub struct PositionDescriptor;

#[contractimpl]
impl PositionDescriptor {
    pub fn initialize(env: Env, wrapped_native: Address, native_label: String) {
        let storage = env.storage().instance();
        if storage.has(&DescriptorKey::WrappedNative) {
            panic!("already initialized");
        }
        storage.set(&DescriptorKey::WrappedNative, &wrapped_native);
        storage.set(&DescriptorKey::NativeLabel, &native_label);
    }

    pub fn wrapped_native(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DescriptorKey::WrappedNative)
            .expect("descriptor not initialized")
    }

    pub fn native_label(env: Env) -> String {
        env.storage()
            .instance()
            .get(&DescriptorKey::NativeLabel)
            .expect("descriptor not initialized")
    }
}
