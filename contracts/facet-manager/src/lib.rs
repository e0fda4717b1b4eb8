#![no_std]
use soroban_sdk::{
    contract, contractevent, contractimpl, contracttype, Address, Env, Symbol, Vec,
};

/// Diamond-style selector routing table. Accounts look a function name up
/// here and invoke whichever facet currently owns it.
#[contracttype]
pub enum DataKey {
    Admin,
    Selector(Symbol),        // owning facet
    Facets,                  // Vec<Address>, registration order
    FacetSelectors(Address), // Vec<Symbol>
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FacetCutAction {
    Add,
    Replace,
    Remove,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FacetCut {
    pub facet: Address,
    pub action: FacetCutAction,
    pub selectors: Vec<Symbol>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FacetCutApplied {
    #[topic]
    pub facet: Address,
    pub action: FacetCutAction,
    pub selectors: Vec<Symbol>,
}

#[contract]
pub struct FacetManager;

#[contractimpl]
impl FacetManager {
    pub fn initialize(env: Env, admin: Address) {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Admin) {
            panic!("already initialized");
        }
        admin.require_auth();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Facets, &Vec::<Address>::new(&env));
    }

    /// Apply a batch of selector cuts. Each cut either attaches selectors to
    /// a facet, repoints them, or detaches them.
    pub fn diamond_cut(env: Env, cuts: Vec<FacetCut>) {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set");
        admin.require_auth();
        for cut in cuts.iter() {
            match cut.action {
                FacetCutAction::Add => add_selectors(&env, &cut.facet, &cut.selectors),
                FacetCutAction::Replace => replace_selectors(&env, &cut.facet, &cut.selectors),
                FacetCutAction::Remove => remove_selectors(&env, &cut.facet, &cut.selectors),
            }
            FacetCutApplied {
                facet: cut.facet.clone(),
                action: cut.action.clone(),
                selectors: cut.selectors.clone(),
            }
            .publish(&env);
        }
    }

    pub fn facet_address(env: Env, selector: Symbol) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Selector(selector))
    }

    pub fn facets(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Facets)
            .unwrap_or(Vec::new(&env))
    }

    pub fn facet_selectors(env: Env, facet: Address) -> Vec<Symbol> {
        env.storage()
            .persistent()
            .get(&DataKey::FacetSelectors(facet))
            .unwrap_or(Vec::new(&env))
    }

    pub fn get_admin(env: Env) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("admin not set")
    }
}

fn add_selectors(env: &Env, facet: &Address, selectors: &Vec<Symbol>) {
    let storage = env.storage().persistent();
    for selector in selectors.iter() {
        if storage.has(&DataKey::Selector(selector.clone())) {
            panic!("selector exists");
        }
        storage.set(&DataKey::Selector(selector.clone()), facet);
    }
    let mut owned: Vec<Symbol> = storage
        .get(&DataKey::FacetSelectors(facet.clone()))
        .unwrap_or(Vec::new(env));
    if owned.is_empty() {
        let mut facets: Vec<Address> = storage
            .get(&DataKey::Facets)
            .unwrap_or(Vec::new(env));
        if !facets.contains(facet.clone()) {
            facets.push_back(facet.clone());
            storage.set(&DataKey::Facets, &facets);
        }
    }
    for selector in selectors.iter() {
        owned.push_back(selector);
    }
    storage.set(&DataKey::FacetSelectors(facet.clone()), &owned);
}

fn replace_selectors(env: &Env, facet: &Address, selectors: &Vec<Symbol>) {
    let storage = env.storage().persistent();
    for selector in selectors.iter() {
        let current: Address = storage
            .get(&DataKey::Selector(selector.clone()))
            .unwrap_or_else(|| panic!("selector missing"));
        if current == *facet {
            panic!("selector unchanged");
        }
        detach_from_facet(env, &current, &selector);
        storage.set(&DataKey::Selector(selector.clone()), facet);
    }
    let mut owned: Vec<Symbol> = storage
        .get(&DataKey::FacetSelectors(facet.clone()))
        .unwrap_or(Vec::new(env));
    if owned.is_empty() {
        let mut facets: Vec<Address> = storage
            .get(&DataKey::Facets)
            .unwrap_or(Vec::new(env));
        if !facets.contains(facet.clone()) {
            facets.push_back(facet.clone());
            storage.set(&DataKey::Facets, &facets);
        }
    }
    for selector in selectors.iter() {
        owned.push_back(selector);
    }
    storage.set(&DataKey::FacetSelectors(facet.clone()), &owned);
}

fn remove_selectors(env: &Env, facet: &Address, selectors: &Vec<Symbol>) {
    let storage = env.storage().persistent();
    for selector in selectors.iter() {
        let current: Address = storage
            .get(&DataKey::Selector(selector.clone()))
            .unwrap_or_else(|| panic!("selector missing"));
        if current != *facet {
            panic!("facet mismatch");
        }
        storage.remove(&DataKey::Selector(selector.clone()));
        detach_from_facet(env, facet, &selector);
    }
}

fn detach_from_facet(env: &Env, facet: &Address, selector: &Symbol) {
    let storage = env.storage().persistent();
    let owned: Vec<Symbol> = storage
        .get(&DataKey::FacetSelectors(facet.clone()))
        .unwrap_or(Vec::new(env));
    let mut kept = Vec::new(env);
    for s in owned.iter() {
        if s != *selector {
            kept.push_back(s);
        }
    }
    if kept.is_empty() {
        storage.remove(&DataKey::FacetSelectors(facet.clone()));
        let facets: Vec<Address> = storage
            .get(&DataKey::Facets)
            .unwrap_or(Vec::new(env));
        let mut remaining = Vec::new(env);
        for f in facets.iter() {
            if f != *facet {
                remaining.push_back(f);
            }
        }
        storage.set(&DataKey::Facets, &remaining);
    } else {
        storage.set(&DataKey::FacetSelectors(facet.clone()), &kept);
    }
}
