use soroban_sdk::{Address, BytesN, contractevent};

use crate::MetadataValue;

#[contractevent(topics = ["control_transferred"], data_format = "single-value")]
pub struct ControlTransferred {
    #[topic]
    pub previous: Address,
    pub controller: Address,
}

#[contractevent(topics = ["loan_token_minted"], data_format = "single-value")]
pub struct LoanTokenMinted {
    #[topic]
    pub to: Address,
    pub token_id: BytesN<32>,
}

#[contractevent(topics = ["loan_token_transferred"])]
pub struct LoanTokenTransferred {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub token_id: BytesN<32>,
}

#[contractevent(topics = ["data_changed"])]
pub struct DataChanged {
    #[topic]
    pub token_id: BytesN<32>,
    #[topic]
    pub key: BytesN<32>,
    pub value: MetadataValue,
}
