#![no_std]

use soroban_sdk::{self, contracttype};

mod error;
mod index_types;
pub mod metadata;
pub mod value;

pub use error::Error;
pub use metadata::{LoanMetadataContract, LoanMetadataContractClient};
pub use value::MetadataValue;

/// Setup phase of the store.
///
/// A freshly deployed store is `Pending`: the deployer holds control but no
/// data may be written. Handing control to the consuming contract moves the
/// store to `Active`, which is final.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlStatus {
    Pending,
    Active,
}

mod test;
