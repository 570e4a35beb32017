use soroban_sdk::{Address, Bytes, BytesN, Env, I256, String, U256, Vec, contractclient, contracttype};

/// Width of a big-endian integer word
const WORD_BYTES: u32 = 32;
/// Longest raw text the store decodes
const MAX_TEXT_BYTES: usize = 1024;

/// Value stored in the metadata store. Variant names and payloads match the
/// store's own definition so both encode identically.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MetadataValue {
    Address(Address),
    UInt256(U256),
    Int256(I256),
    String(String),
    Bytes(Bytes),
}

impl MetadataValue {
    /// Integer value as the store would decode it with `get_decoded_int256`:
    /// raw bytes are a sign-extended big-endian word.
    pub fn units(&self, env: &Env) -> Option<i128> {
        match self {
            MetadataValue::Int256(units) => units.to_i128(),
            MetadataValue::Bytes(raw) => {
                let len = raw.len();
                if len > WORD_BYTES {
                    return None;
                }
                let fill = match raw.get(0) {
                    Some(first) if first & 0x80 != 0 => 0xff,
                    _ => 0,
                };
                let mut word = Bytes::from_array(env, &[fill; 32]).slice(0..WORD_BYTES - len);
                word.append(raw);
                I256::from_be_bytes(env, &word).to_i128()
            }
            _ => None,
        }
    }

    /// Whether the store can decode the value with `get_decoded_string`
    pub fn is_text(&self) -> bool {
        match self {
            MetadataValue::String(_) => true,
            MetadataValue::Bytes(raw) => {
                let len = raw.len() as usize;
                if len > MAX_TEXT_BYTES {
                    return false;
                }
                let mut buf = [0u8; MAX_TEXT_BYTES];
                raw.copy_into_slice(&mut buf[..len]);
                core::str::from_utf8(&buf[..len]).is_ok()
            }
            _ => false,
        }
    }
}

/// Loan metadata store holding per-token loan fields
#[contractclient(name = "LoanMetadataClient")]
pub trait LoanMetadataInterface {
    fn controller(env: Env) -> Option<Address>;

    fn mint(env: Env, to: Address) -> BytesN<32>;

    fn transfer(env: Env, token_id: BytesN<32>, to: Address);

    fn set_data(env: Env, token_id: BytesN<32>, key: BytesN<32>, value: MetadataValue);

    fn set_data_batch(
        env: Env,
        token_id: BytesN<32>,
        keys: Vec<BytesN<32>>,
        values: Vec<MetadataValue>,
    );

    fn get_data(env: Env, token_id: BytesN<32>, key: BytesN<32>) -> Option<MetadataValue>;

    fn get_decoded_address(env: Env, token_id: BytesN<32>, key: BytesN<32>) -> Address;

    fn get_decoded_uint256(env: Env, token_id: BytesN<32>, key: BytesN<32>) -> U256;

    fn get_decoded_int256(env: Env, token_id: BytesN<32>, key: BytesN<32>) -> I256;

    fn get_decoded_string(env: Env, token_id: BytesN<32>, key: BytesN<32>) -> String;
}

/// Registry recording the carbon credits delivered to lenders on swap
#[contractclient(name = "CarbonCreditRegistryClient")]
pub trait CarbonCreditRegistryInterface {
    fn controller(env: Env) -> Option<Address>;

    fn mint(
        env: Env,
        to: Address,
        project_name: String,
        registry_link: String,
        units: i128,
        geographic_identifier: String,
    ) -> u32;
}
