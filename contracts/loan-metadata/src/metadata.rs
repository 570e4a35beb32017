use soroban_sdk::{
    Address, BytesN, Env, I256, String, Symbol, U256, Vec, contract, contractimpl, contracttype,
    log, symbol_short,
};

use crate::ControlStatus;
use crate::error::Error;
use crate::index_types::{ControlTransferred, DataChanged, LoanTokenMinted, LoanTokenTransferred};
use crate::value::MetadataValue;

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contracttype]
#[derive(Clone, Debug)]
pub struct LoanMetadataStorage {
    /// Sole writer once the store is active; the deployer while pending
    controller: Address,
    status: ControlStatus,
    /// Number of loan tokens issued so far
    total_supply: u32,
}

impl LoanMetadataStorage {
    pub fn get_state(env: &Env) -> LoanMetadataStorage {
        env.storage().instance().get(&STORAGE).unwrap()
    }

    pub fn set_state(env: &Env, storage: &LoanMetadataStorage) {
        env.storage().instance().set(&STORAGE, storage);
    }
}

#[contracttype]
enum DataKey {
    Data(BytesN<32>, BytesN<32>),
    Owner(BytesN<32>),
}

/// Token ids are 32-byte big-endian counters starting at `0x00..01`.
fn token_id_from_index(env: &Env, index: u32) -> BytesN<32> {
    let mut raw = [0u8; 32];
    raw[28..].copy_from_slice(&index.to_be_bytes());
    BytesN::from_array(env, &raw)
}

#[contract]
pub struct LoanMetadataContract;

#[contractimpl]
impl LoanMetadataContract {
    pub fn __constructor(env: &Env, admin: Address) {
        Self::set_admin(env, &admin);
        LoanMetadataStorage::set_state(
            env,
            &LoanMetadataStorage {
                controller: admin,
                status: ControlStatus::Pending,
                total_supply: 0,
            },
        );
    }

    /// Upgrade the contract to new wasm. Admin-only.
    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    /// Hand write access to `new_controller` and activate the store. Admin-only, allowed once.
    pub fn transfer_control(env: &Env, new_controller: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut state = LoanMetadataStorage::get_state(env);
        if state.status == ControlStatus::Active {
            return Err(Error::ControlAlreadyTransferred);
        }
        let previous = state.controller.clone();
        state.controller = new_controller.clone();
        state.status = ControlStatus::Active;
        LoanMetadataStorage::set_state(env, &state);

        log!(env, "metadata control transferred to {}", new_controller);
        ControlTransferred {
            previous,
            controller: new_controller,
        }
        .publish(env);
        Ok(())
    }

    /// Active controller, or `None` while the store is still pending.
    pub fn controller(env: &Env) -> Option<Address> {
        let state = LoanMetadataStorage::get_state(env);
        match state.status {
            ControlStatus::Active => Some(state.controller),
            ControlStatus::Pending => None,
        }
    }

    pub fn is_active(env: &Env) -> bool {
        LoanMetadataStorage::get_state(env).status == ControlStatus::Active
    }

    /// Issue the next loan token to `to`. Controller-only.
    pub fn mint(env: &Env, to: Address) -> Result<BytesN<32>, Error> {
        Self::require_controller(env)?;
        let mut state = LoanMetadataStorage::get_state(env);
        let Some(next) = state.total_supply.checked_add(1) else {
            return Err(Error::ArithmeticError);
        };
        state.total_supply = next;
        LoanMetadataStorage::set_state(env, &state);

        let token_id = token_id_from_index(env, next);
        let owner_key = DataKey::Owner(token_id.clone());
        env.storage().persistent().set(&owner_key, &to);
        let ttl = env.storage().max_ttl();
        env.storage().persistent().extend_ttl(&owner_key, ttl, ttl);

        LoanTokenMinted {
            to,
            token_id: token_id.clone(),
        }
        .publish(env);
        Ok(token_id)
    }

    /// Reassign an issued token to `to`. Controller-only.
    pub fn transfer(env: &Env, token_id: BytesN<32>, to: Address) -> Result<(), Error> {
        Self::require_controller(env)?;
        let owner_key = DataKey::Owner(token_id.clone());
        let from: Address = env
            .storage()
            .persistent()
            .get(&owner_key)
            .ok_or(Error::TokenNotFound)?;
        env.storage().persistent().set(&owner_key, &to);
        let ttl = env.storage().max_ttl();
        env.storage().persistent().extend_ttl(&owner_key, ttl, ttl);

        LoanTokenTransferred { from, to, token_id }.publish(env);
        Ok(())
    }

    pub fn owner_of(env: &Env, token_id: BytesN<32>) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(token_id))
            .ok_or(Error::TokenNotFound)
    }

    pub fn total_supply(env: &Env) -> u32 {
        LoanMetadataStorage::get_state(env).total_supply
    }

    /// Overwrite the value under `key` for `token_id`. Controller-only; the
    /// caller is responsible for type consistency.
    pub fn set_data(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
        value: MetadataValue,
    ) -> Result<(), Error> {
        Self::require_controller(env)?;
        Self::write_data(env, token_id, key, value);
        Ok(())
    }

    /// Write several keys for one token in a single call. Controller-only.
    pub fn set_data_batch(
        env: &Env,
        token_id: BytesN<32>,
        keys: Vec<BytesN<32>>,
        values: Vec<MetadataValue>,
    ) -> Result<(), Error> {
        Self::require_controller(env)?;
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch);
        }
        for (key, value) in keys.iter().zip(values.iter()) {
            Self::write_data(env, token_id.clone(), key, value);
        }
        Ok(())
    }

    pub fn get_data(env: &Env, token_id: BytesN<32>, key: BytesN<32>) -> Option<MetadataValue> {
        env.storage().persistent().get(&DataKey::Data(token_id, key))
    }

    pub fn get_decoded_address(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
    ) -> Result<Address, Error> {
        Self::read_data(env, token_id, key)?.decode_address()
    }

    pub fn get_decoded_uint256(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
    ) -> Result<U256, Error> {
        Self::read_data(env, token_id, key)?.decode_u256(env)
    }

    pub fn get_decoded_int256(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
    ) -> Result<I256, Error> {
        Self::read_data(env, token_id, key)?.decode_i256(env)
    }

    pub fn get_decoded_string(
        env: &Env,
        token_id: BytesN<32>,
        key: BytesN<32>,
    ) -> Result<String, Error> {
        Self::read_data(env, token_id, key)?.decode_string(env)
    }

    fn read_data(env: &Env, token_id: BytesN<32>, key: BytesN<32>) -> Result<MetadataValue, Error> {
        Self::get_data(env, token_id, key).ok_or(Error::DataNotFound)
    }

    fn write_data(env: &Env, token_id: BytesN<32>, key: BytesN<32>, value: MetadataValue) {
        let data_key = DataKey::Data(token_id.clone(), key.clone());
        env.storage().persistent().set(&data_key, &value);
        let ttl = env.storage().max_ttl();
        env.storage().persistent().extend_ttl(&data_key, ttl, ttl);
        DataChanged {
            token_id,
            key,
            value,
        }
        .publish(env);
    }

    fn require_controller(env: &Env) -> Result<(), Error> {
        let state = LoanMetadataStorage::get_state(env);
        if state.status != ControlStatus::Active {
            return Err(Error::NotActive);
        }
        state.controller.require_auth();
        Ok(())
    }

    /// Get the admin address
    fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN_KEY)
    }

    /// Set the admin address. Can only be called once.
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
