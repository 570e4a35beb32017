#![cfg(test)]
extern crate std;

use crate::metadata::{LoanMetadataContract, LoanMetadataContractClient};
use crate::{Error, MetadataValue};

use soroban_sdk::{
    Address, Bytes, BytesN, Env, I256, IntoVal, String, Symbol, U256, Val, Vec,
    testutils::Address as _,
    testutils::Events, vec,
};

fn create_metadata_contract<'a>(e: &Env, admin: &Address) -> LoanMetadataContractClient<'a> {
    let contract_id = e.register(LoanMetadataContract, (admin.clone(),));
    LoanMetadataContractClient::new(e, &contract_id)
}

/// Deploys a store and hands control to a fresh controller address.
fn create_active_store<'a>(e: &Env) -> (LoanMetadataContractClient<'a>, Address) {
    let admin = Address::generate(e);
    let store = create_metadata_contract(e, &admin);
    let controller = Address::generate(e);
    store.transfer_control(&controller);
    (store, controller)
}

fn key(e: &Env, byte: u8) -> BytesN<32> {
    BytesN::from_array(e, &[byte; 32])
}

#[test]
fn test_fresh_store_is_pending() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let store = create_metadata_contract(&e, &admin);

    assert!(!store.is_active());
    assert_eq!(store.controller(), None);
    assert_eq!(store.total_supply(), 0);

    let to = Address::generate(&e);
    let result = store.try_mint(&to);
    assert_eq!(result.unwrap_err().unwrap(), Error::NotActive.into());

    let token_id = key(&e, 1);
    let result = store.try_set_data(
        &token_id,
        &key(&e, 2),
        &MetadataValue::UInt256(U256::from_u32(&e, 5)),
    );
    assert_eq!(result.unwrap_err().unwrap(), Error::NotActive.into());
}

#[test]
fn test_transfer_control_once() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let store = create_metadata_contract(&e, &admin);
    let controller = Address::generate(&e);

    store.transfer_control(&controller);
    assert!(store.is_active());
    assert_eq!(store.controller(), Some(controller.clone()));

    let events = e.events().all();
    assert_eq!(
        events,
        vec![
            &e,
            (
                store.address.clone(),
                (Symbol::new(&e, "control_transferred"), admin.clone()).into_val(&e),
                controller.into_val(&e)
            ),
        ]
    );

    let other = Address::generate(&e);
    let result = store.try_transfer_control(&other);
    assert_eq!(
        result.unwrap_err().unwrap(),
        Error::ControlAlreadyTransferred.into()
    );
}

#[test]
fn test_transfer_control_requires_admin() {
    let e = Env::default();

    let admin = Address::generate(&e);
    let store = create_metadata_contract(&e, &admin);
    let controller = Address::generate(&e);

    e.mock_auths(&[]);
    assert!(store.try_transfer_control(&controller).is_err());
    assert!(!store.is_active());
}

#[test]
fn test_mint_assigns_sequential_ids() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let alice = Address::generate(&e);
    let bob = Address::generate(&e);

    let first = store.mint(&alice);
    let second = store.mint(&bob);

    let mut expected = [0u8; 32];
    expected[31] = 1;
    assert_eq!(first, BytesN::from_array(&e, &expected));
    expected[31] = 2;
    assert_eq!(second, BytesN::from_array(&e, &expected));

    assert_eq!(store.owner_of(&first), alice);
    assert_eq!(store.owner_of(&second), bob);
    assert_eq!(store.total_supply(), 2);

    let result = store.try_owner_of(&key(&e, 9));
    assert_eq!(result.unwrap_err().unwrap(), Error::TokenNotFound.into());
}

#[test]
fn test_transfer_reassigns_owner() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, controller) = create_active_store(&e);
    let alice = Address::generate(&e);
    let bob = Address::generate(&e);
    let token_id = store.mint(&alice);

    store.transfer(&token_id, &bob);
    assert_eq!(store.owner_of(&token_id), bob);
    assert_eq!(e.auths()[0].0, controller);

    let events = e.events().all();
    assert_eq!(events.len(), 1);
    let (contract, topics, _) = events.get(0).unwrap();
    assert_eq!(contract, store.address);
    let expected: Vec<Val> =
        (Symbol::new(&e, "loan_token_transferred"), alice, bob.clone()).into_val(&e);
    assert_eq!(topics, expected);

    let result = store.try_transfer(&key(&e, 9), &bob);
    assert_eq!(result.unwrap_err().unwrap(), Error::TokenNotFound.into());
}

#[test]
fn test_writes_require_controller_auth() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let token_id = key(&e, 1);

    e.mock_auths(&[]);
    let result = store.try_set_data(
        &token_id,
        &key(&e, 2),
        &MetadataValue::UInt256(U256::from_u32(&e, 5)),
    );
    assert!(result.is_err());
    assert_eq!(store.get_data(&token_id, &key(&e, 2)), None);
}

#[test]
fn test_set_and_decode_typed_values() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let owner = Address::generate(&e);
    let token_id = store.mint(&owner);

    let lender = Address::generate(&e);
    store.set_data(&token_id, &key(&e, 1), &MetadataValue::Address(lender.clone()));
    store.set_data(
        &token_id,
        &key(&e, 2),
        &MetadataValue::UInt256(U256::from_u128(&e, 1_000_000_000_000_000_000_000)),
    );
    store.set_data(&token_id, &key(&e, 3), &MetadataValue::Int256(I256::from_i32(&e, -42)));
    store.set_data(
        &token_id,
        &key(&e, 4),
        &MetadataValue::String(String::from_str(&e, "Rimba Raya")),
    );

    assert_eq!(store.get_decoded_address(&token_id, &key(&e, 1)), lender);
    assert_eq!(
        store.get_decoded_uint256(&token_id, &key(&e, 2)),
        U256::from_u128(&e, 1_000_000_000_000_000_000_000)
    );
    assert_eq!(
        store.get_decoded_int256(&token_id, &key(&e, 3)),
        I256::from_i32(&e, -42)
    );
    assert_eq!(
        store.get_decoded_string(&token_id, &key(&e, 4)),
        String::from_str(&e, "Rimba Raya")
    );

    // overwrite keeps only the latest value
    store.set_data(&token_id, &key(&e, 2), &MetadataValue::UInt256(U256::from_u32(&e, 7)));
    assert_eq!(
        store.get_decoded_uint256(&token_id, &key(&e, 2)),
        U256::from_u32(&e, 7)
    );
}

#[test]
fn test_decode_errors() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let token_id = key(&e, 1);

    let result = store.try_get_decoded_uint256(&token_id, &key(&e, 1));
    assert_eq!(result.unwrap_err().unwrap(), Error::DataNotFound.into());
    assert_eq!(store.get_data(&token_id, &key(&e, 1)), None);

    store.set_data(
        &token_id,
        &key(&e, 1),
        &MetadataValue::String(String::from_str(&e, "not an address")),
    );
    let result = store.try_get_decoded_address(&token_id, &key(&e, 1));
    assert_eq!(result.unwrap_err().unwrap(), Error::DecodeMismatch.into());
    let result = store.try_get_decoded_uint256(&token_id, &key(&e, 1));
    assert_eq!(result.unwrap_err().unwrap(), Error::DecodeMismatch.into());
}

#[test]
fn test_decode_raw_bytes() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let token_id = key(&e, 1);

    // short big-endian word
    store.set_data(
        &token_id,
        &key(&e, 1),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[0x01, 0x00])),
    );
    assert_eq!(
        store.get_decoded_uint256(&token_id, &key(&e, 1)),
        U256::from_u32(&e, 256)
    );

    // negative two's complement payload is sign-extended
    store.set_data(
        &token_id,
        &key(&e, 2),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[0xff, 0xfe])),
    );
    assert_eq!(
        store.get_decoded_int256(&token_id, &key(&e, 2)),
        I256::from_i32(&e, -2)
    );

    store.set_data(
        &token_id,
        &key(&e, 3),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[0u8; 33])),
    );
    let result = store.try_get_decoded_uint256(&token_id, &key(&e, 3));
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidDataLength.into());

    store.set_data(
        &token_id,
        &key(&e, 4),
        &MetadataValue::Bytes(Bytes::from_slice(&e, "Verra".as_bytes())),
    );
    assert_eq!(
        store.get_decoded_string(&token_id, &key(&e, 4)),
        String::from_str(&e, "Verra")
    );

    store.set_data(
        &token_id,
        &key(&e, 5),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[0xc3, 0x28])),
    );
    let result = store.try_get_decoded_string(&token_id, &key(&e, 5));
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidUtf8.into());

    // long links decode up to the 1024 byte cap
    store.set_data(
        &token_id,
        &key(&e, 6),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[b'a'; 300])),
    );
    assert_eq!(
        store.get_decoded_string(&token_id, &key(&e, 6)),
        String::from_bytes(&e, &[b'a'; 300])
    );

    store.set_data(
        &token_id,
        &key(&e, 7),
        &MetadataValue::Bytes(Bytes::from_array(&e, &[b'a'; 1025])),
    );
    let result = store.try_get_decoded_string(&token_id, &key(&e, 7));
    assert_eq!(result.unwrap_err().unwrap(), Error::InvalidDataLength.into());
}

#[test]
fn test_set_data_batch() {
    let e = Env::default();
    e.mock_all_auths();

    let (store, _) = create_active_store(&e);
    let token_id = key(&e, 1);

    let keys: Vec<BytesN<32>> = vec![&e, key(&e, 1), key(&e, 2)];
    let values: Vec<MetadataValue> = vec![
        &e,
        MetadataValue::UInt256(U256::from_u32(&e, 10)),
        MetadataValue::UInt256(U256::from_u32(&e, 20)),
    ];
    store.set_data_batch(&token_id, &keys, &values);

    assert_eq!(e.events().all().len(), 2);
    assert_eq!(
        store.get_decoded_uint256(&token_id, &key(&e, 1)),
        U256::from_u32(&e, 10)
    );
    assert_eq!(
        store.get_decoded_uint256(&token_id, &key(&e, 2)),
        U256::from_u32(&e, 20)
    );

    let short: Vec<MetadataValue> = vec![&e, MetadataValue::UInt256(U256::from_u32(&e, 1))];
    let result = store.try_set_data_batch(&token_id, &keys, &short);
    assert_eq!(result.unwrap_err().unwrap(), Error::LengthMismatch.into());
}
