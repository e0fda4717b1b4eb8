use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, Env};

use crate::{require_owner, AccountContext};

#[contracttype]
pub enum DelegatorKey {
    Manager(Address, Address), // (account, manager)
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagerAdded {
    #[topic]
    pub account: Address,
    pub manager: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagerRemoved {
    #[topic]
    pub account: Address,
    pub manager: Address,
}

/// Owner-granted operator list per account.
#[contract]
pub struct DelegatorFacet;

#[contractimpl]
impl DelegatorFacet {
    pub fn add_manager(env: Env, ctx: AccountContext, manager: Address) {
        require_owner(&ctx);
        let account = ctx.account;
        env.storage()
            .persistent()
            .set(&DelegatorKey::Manager(account.clone(), manager.clone()), &true);
        ManagerAdded { account, manager }.publish(&env);
    }

    pub fn remove_manager(env: Env, ctx: AccountContext, manager: Address) {
        require_owner(&ctx);
        let account = ctx.account;
        env.storage()
            .persistent()
            .remove(&DelegatorKey::Manager(account.clone(), manager.clone()));
        ManagerRemoved { account, manager }.publish(&env);
    }

    pub fn is_manager(env: Env, account: Address, manager: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DelegatorKey::Manager(account, manager))
            .unwrap_or(false)
    }
}
