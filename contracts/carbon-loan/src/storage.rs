use soroban_sdk::{Vec, contracttype};

use crate::swap::SwapQuote;

/// Terms fixed when the loan is created
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanTerms {
    /// Yearly rate in whole percent
    pub apy: u32,
    pub amortization_period_in_months: u32,
    pub lock_up_period_in_months: u32,
    /// Fee taken from every installment, in basis points
    pub transaction_bps: u32,
    /// Whole carbon credits pledged as collateral
    pub carbon_credits_staked: i128,
}

/// Loan fields kept by this contract rather than in the metadata store
#[contracttype]
#[derive(Clone)]
pub struct LoanRecord {
    pub terms: LoanTerms,
    /// Due timestamps, non-decreasing. Empty until a schedule is set.
    pub schedule: Vec<u64>,
    /// Principal held by the contract between funding and acceptance
    pub custody_balance: i128,
    /// Price and profit of the last evaluation that made the loan swappable
    pub swap_quote: Option<SwapQuote>,
}

impl LoanRecord {
    #[must_use]
    pub fn new(terms: LoanTerms, schedule: Vec<u64>) -> Self {
        LoanRecord {
            terms,
            schedule,
            custody_balance: 0,
            swap_quote: None,
        }
    }
}
