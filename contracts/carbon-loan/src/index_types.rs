use soroban_sdk::{Address, Bytes, BytesN, String, contractevent};

use crate::{LoanTerms, MetadataValue};

#[contractevent(topics = ["loan_created"])]
pub struct LoanCreated {
    #[topic]
    pub token_id: BytesN<32>,
    #[topic]
    pub lender: Address,
    pub borrower: Option<Address>,
    pub initial_loan_amount: i128,
    pub terms: LoanTerms,
}

#[contractevent(topics = ["loan_funded"])]
pub struct LoanFunded {
    #[topic]
    pub token_id: BytesN<32>,
    pub initiator: Address,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub success: bool,
    pub data: Bytes,
}

#[contractevent(topics = ["loan_accepted"])]
pub struct LoanAccepted {
    #[topic]
    pub token_id: BytesN<32>,
    pub initiator: Address,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub success: bool,
    pub data: Bytes,
}

#[contractevent(topics = ["payment_made"])]
pub struct PaymentMade {
    #[topic]
    pub token_id: BytesN<32>,
    pub initiator: Address,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub success: bool,
    pub data: Bytes,
}

#[contractevent(topics = ["loan_repayed"], data_format = "single-value")]
pub struct LoanRepayed {
    #[topic]
    pub token_id: BytesN<32>,
    pub borrower: Address,
}

#[contractevent(topics = ["loan_liquidated"])]
pub struct LoanLiquidated {
    #[topic]
    pub token_id: BytesN<32>,
    pub initiator: Address,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub success: bool,
    pub data: Bytes,
}

#[contractevent(topics = ["loan_swappable"])]
pub struct LoanSwappable {
    #[topic]
    pub token_id: BytesN<32>,
    pub credits_staked: i128,
    pub profit: i128,
    pub profit_bps: i128,
}

#[contractevent(topics = ["loan_swapped"])]
pub struct LoanSwapped {
    #[topic]
    pub token_id: BytesN<32>,
    pub credits_staked: i128,
    pub profit: i128,
    pub profit_bps: i128,
}

#[contractevent(topics = ["loan_not_swappable"])]
pub struct LoanNotSwappable {
    #[topic]
    pub token_id: BytesN<32>,
    pub credits_staked: i128,
    pub profit: i128,
    pub profit_bps: i128,
}

#[contractevent(topics = ["loan_no_longer_swappable"], data_format = "single-value")]
pub struct LoanNoLongerSwappable {
    #[topic]
    pub token_id: BytesN<32>,
    pub profit_bps: i128,
}

#[contractevent(topics = ["project_added"])]
pub struct ProjectAdded {
    #[topic]
    pub token_id: BytesN<32>,
    pub name: String,
    pub link: String,
    pub units: i128,
    pub geographic_identifier: String,
    pub verification_link: String,
    pub index: u32,
}

#[contractevent(topics = ["project_element_updated"])]
pub struct ProjectElementUpdated {
    #[topic]
    pub token_id: BytesN<32>,
    pub index: u32,
    pub key: BytesN<32>,
    pub value: MetadataValue,
}

#[contractevent(topics = ["carbon_credit_price_updated"])]
pub struct CarbonCreditPriceUpdated {
    pub price: i128,
    pub timestamp: u64,
}
