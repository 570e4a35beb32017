#![no_std]

use soroban_sdk::{self, Address, BytesN, String, contracttype};

mod error;
mod index_types;
mod interfaces;
pub mod keys;
pub mod loan;
pub mod math;
mod settlement;
mod storage;
pub mod swap;

pub use error::Error;
pub use interfaces::MetadataValue;
pub use loan::{CarbonLoanContract, CarbonLoanContractClient};
pub use settlement::SettlementAsset;
pub use storage::LoanTerms;
pub use swap::{PriceSnapshot, SwapDecision, SwapOutcome, SwapQuote};

/// Lifecycle of a loan. Discriminants are the values written under the
/// loan status key and must stay stable.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LoanState {
    /// Minted, waiting for the lender to fund it
    Created = 0,
    /// Principal held by the contract, waiting for the borrower
    Funded = 1,
    /// Principal released to the borrower, repayments running
    Taken = 2,
    Repaid = 3,
    Liquidated = 4,
    /// Pledged credits are worth enough to close the loan by swap
    Swappable = 5,
    Swapped = 6,
}

impl LoanState {
    pub fn from_code(code: u32) -> Option<LoanState> {
        match code {
            0 => Some(LoanState::Created),
            1 => Some(LoanState::Funded),
            2 => Some(LoanState::Taken),
            3 => Some(LoanState::Repaid),
            4 => Some(LoanState::Liquidated),
            5 => Some(LoanState::Swappable),
            6 => Some(LoanState::Swapped),
            _ => None,
        }
    }

    /// Repaid, liquidated and swapped loans accept no further changes
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            LoanState::Repaid | LoanState::Liquidated | LoanState::Swapped
        )
    }
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CreateLoanParams {
    pub lender: Address,
    pub borrower: Option<Address>,
    pub initial_loan_amount: i128,
    pub apy: u32,
    pub amortization_period_in_months: u32,
    pub lock_up_period_in_months: u32,
    pub transaction_bps: u32,
    pub carbon_credits_staked: i128,
}

/// Carbon project whose credits back a loan
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifiedProject {
    pub name: String,
    pub link: String,
    pub units: i128,
    pub geographic_identifier: String,
    /// Where the project's verification can be checked
    pub verification_link: String,
}

/// Full view of a loan assembled from the metadata store and local records
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanView {
    pub token_id: BytesN<32>,
    pub lender: Address,
    pub borrower: Option<Address>,
    pub state: LoanState,
    pub initial_loan_amount: i128,
    pub loan_balance: i128,
    pub payment_index: u32,
    pub carbon_credits_balance: i128,
    pub custody_balance: i128,
    pub terms: LoanTerms,
}
