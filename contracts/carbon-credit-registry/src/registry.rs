use soroban_sdk::{
    Address, BytesN, Env, String, Symbol, Vec, contract, contractimpl, contracttype, log,
    panic_with_error, symbol_short,
};

use crate::error::Error;
use crate::index_types::{ControlTransferred, Minted};
use crate::{CarbonCreditRecord, ControlStatus};

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contracttype]
#[derive(Clone, Debug)]
pub struct RegistryStorage {
    name: String,
    symbol: String,
    controller: Address,
    status: ControlStatus,
    total_supply: u32,
}

impl RegistryStorage {
    pub fn get_state(env: &Env) -> RegistryStorage {
        env.storage().instance().get(&STORAGE).unwrap()
    }

    pub fn set_state(env: &Env, storage: &RegistryStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

#[contracttype]
enum DataKey {
    Record(u32),
    Owner(u32),
    Holdings(Address),
}

#[contract]
pub struct CarbonCreditRegistry;

#[contractimpl]
impl CarbonCreditRegistry {
    pub fn __constructor(env: &Env, admin: Address, name: String, symbol: String) {
        Self::set_admin(env, &admin);
        RegistryStorage::set_state(
            env,
            &RegistryStorage {
                name,
                symbol,
                controller: admin,
                status: ControlStatus::Pending,
                total_supply: 0,
            },
        );
    }

    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Hand minting rights to `new_controller`. Admin-only, allowed once.
    pub fn transfer_control(env: &Env, new_controller: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = RegistryStorage::get_state(env);
        if state.status == ControlStatus::Active {
            return Err(Error::ControlAlreadyTransferred);
        }
        let previous = state.controller.clone();
        state.controller = new_controller.clone();
        state.status = ControlStatus::Active;
        RegistryStorage::set_state(env, &state);

        log!(env, "registry control transferred to {}", new_controller);
        ControlTransferred {
            previous,
            controller: new_controller,
        }
        .publish(env);
        Ok(())
    }

    pub fn controller(env: &Env) -> Option<Address> {
        let state = RegistryStorage::get_state(env);
        match state.status {
            ControlStatus::Active => Some(state.controller),
            ControlStatus::Pending => None,
        }
    }

    pub fn is_active(env: &Env) -> bool {
        RegistryStorage::get_state(env).status == ControlStatus::Active
    }

    /// Issue a record of `units` credits from a verified project to `to`.
    /// Controller-only; ids start at 1.
    pub fn mint(
        env: &Env,
        to: Address,
        project_name: String,
        registry_link: String,
        units: i128,
        geographic_identifier: String,
    ) -> Result<u32, Error> {
        let mut state = RegistryStorage::get_state(env);
        if state.status != ControlStatus::Active {
            return Err(Error::NotActive);
        }
        state.controller.require_auth();
        if units <= 0 {
            return Err(Error::ValueNotPositive);
        }

        let id = state
            .total_supply
            .checked_add(1)
            .unwrap_or_else(|| panic_with_error!(env, Error::ArithmeticError));
        state.total_supply = id;
        RegistryStorage::set_state(env, &state);

        let record = CarbonCreditRecord {
            project_name,
            registry_link,
            units,
            geographic_identifier,
        };
        let ttl = env.storage().max_ttl();
        let persistent = env.storage().persistent();
        persistent.set(&DataKey::Record(id), &record);
        persistent.extend_ttl(&DataKey::Record(id), ttl, ttl);
        persistent.set(&DataKey::Owner(id), &to);
        persistent.extend_ttl(&DataKey::Owner(id), ttl, ttl);

        let holdings_key = DataKey::Holdings(to.clone());
        let mut holdings: Vec<u32> = persistent
            .get(&holdings_key)
            .unwrap_or_else(|| Vec::new(env));
        holdings.push_back(id);
        persistent.set(&holdings_key, &holdings);
        persistent.extend_ttl(&holdings_key, ttl, ttl);

        log!(env, "minted record {} of {} units", id, units);
        Minted { to, id, units }.publish(env);
        Ok(id)
    }

    pub fn owner_of(env: &Env, id: u32) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(id))
            .ok_or(Error::RecordNotFound)
    }

    pub fn get_record(env: &Env, id: u32) -> Result<CarbonCreditRecord, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Record(id))
            .ok_or(Error::RecordNotFound)
    }

    /// Ids of all records held by `owner`, in mint order
    pub fn records_of(env: &Env, owner: Address) -> Vec<u32> {
        env.storage()
            .persistent()
            .get(&DataKey::Holdings(owner))
            .unwrap_or_else(|| Vec::new(env))
    }

    pub fn total_supply(env: &Env) -> u32 {
        RegistryStorage::get_state(env).total_supply
    }

    pub fn name(env: &Env) -> String {
        RegistryStorage::get_state(env).name
    }

    pub fn symbol(env: &Env) -> String {
        RegistryStorage::get_state(env).symbol
    }

    fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN_KEY)
    }

    fn set_admin(env: &Env, admin: &Address) {
        if env.storage().instance().has(&ADMIN_KEY) {
            panic!("admin already set");
        }
        env.storage().instance().set(&ADMIN_KEY, admin);
    }

    fn require_admin(env: &Env) {
        let admin = Self::admin(env).expect("admin not set");
        admin.require_auth();
    }
}
