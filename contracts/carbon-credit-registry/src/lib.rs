#![no_std]

use soroban_sdk::{self, String, contracttype};

mod error;
mod index_types;
pub mod registry;

pub use error::Error;
pub use registry::{CarbonCreditRegistry, CarbonCreditRegistryClient};

/// Verified project a record was issued against, with the credit units it carries
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CarbonCreditRecord {
    pub project_name: String,
    pub registry_link: String,
    pub units: i128,
    pub geographic_identifier: String,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlStatus {
    Pending,
    Active,
}

mod test;
