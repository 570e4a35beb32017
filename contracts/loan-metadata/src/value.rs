use soroban_sdk::{Address, Bytes, Env, I256, String, U256, contracttype};

use crate::Error;

/// Width of a big-endian integer word
const WORD_BYTES: u32 = 32;
/// Longest raw byte string decoded as text. Longer payloads fail
/// `InvalidDataLength`; typed `String` values have no such cap.
const MAX_STRING_BYTES: usize = 1024;

/// Tagged value stored under a `(token_id, key)` pair.
///
/// Values written by the loan contract are always tagged with their type.
/// `Bytes` carries opaque payloads and is decoded by convention: integers as
/// big-endian words of at most 32 bytes, text as UTF-8.
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
    pub fn decode_address(&self) -> Result<Address, Error> {
        match self {
            MetadataValue::Address(address) => Ok(address.clone()),
            _ => Err(Error::DecodeMismatch),
        }
    }

    pub fn decode_u256(&self, env: &Env) -> Result<U256, Error> {
        match self {
            MetadataValue::UInt256(value) => Ok(value.clone()),
            MetadataValue::Bytes(raw) => Ok(U256::from_be_bytes(env, &left_pad(env, raw, 0)?)),
            _ => Err(Error::DecodeMismatch),
        }
    }

    pub fn decode_i256(&self, env: &Env) -> Result<I256, Error> {
        match self {
            MetadataValue::Int256(value) => Ok(value.clone()),
            MetadataValue::Bytes(raw) => {
                // sign-extend short two's complement payloads
                let fill = match raw.get(0) {
                    Some(first) if first & 0x80 != 0 => 0xff,
                    _ => 0,
                };
                Ok(I256::from_be_bytes(env, &left_pad(env, raw, fill)?))
            }
            _ => Err(Error::DecodeMismatch),
        }
    }

    pub fn decode_string(&self, env: &Env) -> Result<String, Error> {
        match self {
            MetadataValue::String(value) => Ok(value.clone()),
            MetadataValue::Bytes(raw) => {
                let len = raw.len() as usize;
                if len > MAX_STRING_BYTES {
                    return Err(Error::InvalidDataLength);
                }
                let mut buf = [0u8; MAX_STRING_BYTES];
                raw.copy_into_slice(&mut buf[..len]);
                let text = core::str::from_utf8(&buf[..len]).map_err(|_| Error::InvalidUtf8)?;
                Ok(String::from_str(env, text))
            }
            _ => Err(Error::DecodeMismatch),
        }
    }
}

fn left_pad(env: &Env, raw: &Bytes, fill: u8) -> Result<Bytes, Error> {
    let len = raw.len();
    if len > WORD_BYTES {
        return Err(Error::InvalidDataLength);
    }
    let mut word = Bytes::from_array(env, &[fill; 32]).slice(0..WORD_BYTES - len);
    word.append(raw);
    Ok(word)
}
