#![cfg(test)]
extern crate std;

use crate::registry::{CarbonCreditRegistry, CarbonCreditRegistryClient};
use crate::{CarbonCreditRecord, Error};

use soroban_sdk::{Address, Env, String, testutils::Address as _, testutils::Events, vec};

fn create_registry<'a>(e: &Env, admin: &Address) -> CarbonCreditRegistryClient<'a> {
    let contract_id = e.register(
        CarbonCreditRegistry,
        (
            admin.clone(),
            String::from_str(e, "Nyx Carbon Credits"),
            String::from_str(e, "NYXCC"),
        ),
    );
    CarbonCreditRegistryClient::new(e, &contract_id)
}

fn mint_rimba_raya(e: &Env, registry: &CarbonCreditRegistryClient, to: &Address, units: i128) -> u32 {
    registry.mint(
        to,
        &String::from_str(e, "Rimba Raya"),
        &String::from_str(e, "https://registry.verra.org/app/projectDetail/VCS/674"),
        &units,
        &String::from_str(e, "ID-KT"),
    )
}

#[test]
fn test_registry_initialization() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);

    assert_eq!(registry.name(), String::from_str(&e, "Nyx Carbon Credits"));
    assert_eq!(registry.symbol(), String::from_str(&e, "NYXCC"));
    assert_eq!(registry.total_supply(), 0);
    assert!(!registry.is_active());
    assert_eq!(registry.controller(), None);
}

#[test]
fn test_mint_refused_while_pending() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);
    let lender = Address::generate(&e);

    let result = registry.try_mint(
        &lender,
        &String::from_str(&e, "Rimba Raya"),
        &String::from_str(&e, "https://registry.verra.org"),
        &10,
        &String::from_str(&e, "ID-KT"),
    );
    assert_eq!(result.unwrap_err().unwrap(), Error::NotActive.into());
}

#[test]
fn test_transfer_control_once() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);
    let controller = Address::generate(&e);

    registry.transfer_control(&controller);
    assert_eq!(registry.controller(), Some(controller));

    let result = registry.try_transfer_control(&Address::generate(&e));
    assert_eq!(
        result.unwrap_err().unwrap(),
        Error::ControlAlreadyTransferred.into()
    );
}

#[test]
fn test_mint_records() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);
    registry.transfer_control(&Address::generate(&e));

    let lender = Address::generate(&e);
    let other = Address::generate(&e);

    let first = mint_rimba_raya(&e, &registry, &lender, 15);
    assert_eq!(e.events().all().len(), 1);
    let second = mint_rimba_raya(&e, &registry, &other, 5);
    let third = mint_rimba_raya(&e, &registry, &lender, 10);

    assert_eq!((first, second, third), (1, 2, 3));
    assert_eq!(registry.total_supply(), 3);
    assert_eq!(registry.owner_of(&second), other);
    assert_eq!(registry.records_of(&lender), vec![&e, 1u32, 3u32]);
    assert_eq!(registry.records_of(&Address::generate(&e)).len(), 0);

    assert_eq!(
        registry.get_record(&first),
        CarbonCreditRecord {
            project_name: String::from_str(&e, "Rimba Raya"),
            registry_link: String::from_str(
                &e,
                "https://registry.verra.org/app/projectDetail/VCS/674"
            ),
            units: 15,
            geographic_identifier: String::from_str(&e, "ID-KT"),
        }
    );

    let result = registry.try_get_record(&4);
    assert_eq!(result.unwrap_err().unwrap(), Error::RecordNotFound.into());
    let result = registry.try_owner_of(&4);
    assert_eq!(result.unwrap_err().unwrap(), Error::RecordNotFound.into());
}

#[test]
fn test_mint_rejects_non_positive_units() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);
    registry.transfer_control(&Address::generate(&e));

    let result = registry.try_mint(
        &Address::generate(&e),
        &String::from_str(&e, "Rimba Raya"),
        &String::from_str(&e, "https://registry.verra.org"),
        &0,
        &String::from_str(&e, "ID-KT"),
    );
    assert_eq!(result.unwrap_err().unwrap(), Error::ValueNotPositive.into());
}

#[test]
fn test_mint_requires_controller_auth() {
    let e = Env::default();
    e.mock_all_auths();

    let admin = Address::generate(&e);
    let registry = create_registry(&e, &admin);
    registry.transfer_control(&Address::generate(&e));

    e.mock_auths(&[]);
    let result = registry.try_mint(
        &Address::generate(&e),
        &String::from_str(&e, "Rimba Raya"),
        &String::from_str(&e, "https://registry.verra.org"),
        &10,
        &String::from_str(&e, "ID-KT"),
    );
    assert!(result.is_err());
    assert_eq!(registry.total_supply(), 0);
}
