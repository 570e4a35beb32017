use soroban_sdk::{Address, contractevent};

#[contractevent(topics = ["control_transferred"], data_format = "single-value")]
pub struct ControlTransferred {
    #[topic]
    pub previous: Address,
    pub controller: Address,
}

#[contractevent(topics = ["minted"])]
pub struct Minted {
    #[topic]
    pub to: Address,
    pub id: u32,
    pub units: i128,
}
