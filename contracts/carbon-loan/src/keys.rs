//! Metadata keys under which loan fields are stored for each loan token.
//!
//! Values are fixed 32-byte identifiers shared with the off-chain indexer,
//! so they must never change.

use soroban_sdk::{BytesN, Env};

/// Address of the lender
pub const NYX_LENDER: [u8; 32] = [
    0x3d, 0x4a, 0xe4, 0x2d, 0xee, 0x41, 0x56, 0xa4,
    0x48, 0xef, 0xc6, 0x82, 0x06, 0x21, 0xc2, 0xbb,
    0x68, 0xdd, 0xb7, 0x1f, 0x0a, 0x85, 0x33, 0x3f,
    0x1c, 0x5a, 0xc2, 0x46, 0xfc, 0x70, 0x51, 0x9d,
];
/// `LoanState` discriminant
pub const NYX_LOAN_STATUS: [u8; 32] = [
    0x48, 0x32, 0xcf, 0x0e, 0x94, 0xb7, 0x26, 0x9e,
    0x1c, 0xfb, 0x34, 0x81, 0xa8, 0xa7, 0xcb, 0x07,
    0x75, 0x70, 0xa2, 0x4d, 0xba, 0x26, 0xf7, 0x42,
    0x90, 0xb3, 0x00, 0xd0, 0xa1, 0x1f, 0xf6, 0x94,
];
/// Principal
pub const NYX_INITIAL_LOAN_AMOUNT: [u8; 32] = [
    0x6c, 0x0a, 0xcc, 0xac, 0xa6, 0xd4, 0x14, 0xcf,
    0xc7, 0x22, 0x78, 0x17, 0xf2, 0x6f, 0x01, 0x09,
    0x88, 0xcc, 0x73, 0xe7, 0x37, 0x53, 0x91, 0x2f,
    0xdf, 0xaa, 0x53, 0xa8, 0xa5, 0x8d, 0xa9, 0x14,
];
/// Address of the borrower, absent until assigned
pub const NYX_BORROWER: [u8; 32] = [
    0x85, 0x74, 0x9a, 0xcc, 0x80, 0x7d, 0x69, 0x12,
    0x3d, 0x0d, 0x55, 0x06, 0xd4, 0xf5, 0x00, 0x90,
    0xa0, 0x74, 0xae, 0xb2, 0x60, 0x6b, 0x3c, 0x24,
    0x03, 0x13, 0x43, 0xbc, 0x2f, 0xe3, 0x2a, 0xe9,
];
/// Outstanding total loan value
pub const NYX_LOAN_BALANCE: [u8; 32] = [
    0xa4, 0x7b, 0x91, 0x77, 0x88, 0x0a, 0x98, 0x39,
    0x1d, 0x6c, 0x9d, 0x9c, 0x68, 0xce, 0x41, 0x1d,
    0x4e, 0x34, 0xd0, 0x69, 0x43, 0x90, 0x77, 0x79,
    0x0d, 0x5e, 0x35, 0xde, 0x0e, 0x92, 0x92, 0x62,
];
/// Number of payments made against the current schedule
pub const NYX_PAYMENT_INDEX: [u8; 32] = [
    0x27, 0x76, 0xcb, 0xcf, 0xd8, 0x49, 0x0f, 0x89,
    0x4b, 0x0f, 0x24, 0x45, 0x2a, 0x3c, 0x0c, 0xd4,
    0xbe, 0x0b, 0x00, 0x7b, 0xd3, 0x5e, 0x9a, 0x31,
    0xd3, 0x38, 0x40, 0x0b, 0x8d, 0x86, 0x35, 0xab,
];
/// Credits still backing the loan
pub const NYX_CARBON_CREDITS_BALANCE: [u8; 32] = [
    0x0f, 0xba, 0xf5, 0x37, 0x82, 0x9b, 0x45, 0x6e,
    0xa9, 0xce, 0x20, 0xbf, 0xf3, 0x4b, 0x64, 0x32,
    0x64, 0x9b, 0x4d, 0x01, 0x04, 0x6f, 0x31, 0x01,
    0x1b, 0x07, 0x2b, 0x99, 0x54, 0x4c, 0xb3, 0xba,
];
/// Project name list
pub const NYX_VERIFIED_PROJECT_NAMES: [u8; 32] = [
    0x71, 0x14, 0x3f, 0x11, 0x58, 0xce, 0x91, 0x56,
    0x33, 0xaf, 0xa5, 0x3e, 0x42, 0x90, 0xc2, 0xa1,
    0xb6, 0x37, 0xa8, 0xaa, 0x3e, 0xa7, 0xfb, 0x43,
    0x9b, 0xa1, 0x31, 0xfb, 0x2d, 0x64, 0x68, 0x08,
];
/// Project registry link list
pub const NYX_VERIFIED_PROJECT_LINKS: [u8; 32] = [
    0x78, 0x36, 0xeb, 0x25, 0x01, 0x88, 0x34, 0x88,
    0xd4, 0x09, 0x28, 0x5c, 0x15, 0x40, 0xef, 0x51,
    0xe4, 0xc8, 0xbf, 0xa9, 0xa8, 0x62, 0x73, 0x4e,
    0xb5, 0x4f, 0xf8, 0x4c, 0xe4, 0xcc, 0x46, 0xd7,
];
/// Project credit units list
pub const NYX_VERIFIED_PROJECT_UNITS: [u8; 32] = [
    0xec, 0xce, 0x39, 0xcd, 0xb4, 0xf5, 0x59, 0xd5,
    0xed, 0x12, 0x0e, 0x74, 0x90, 0xf7, 0x6f, 0x8b,
    0x55, 0xf0, 0x40, 0x09, 0x46, 0x65, 0x42, 0x4b,
    0x10, 0xde, 0x24, 0xc6, 0x5a, 0xee, 0xad, 0x6e,
];
/// Project geographic identifier list
pub const NYX_VERIFIED_PROJECT_GEOGRAPHIC_IDENTIFIERS: [u8; 32] = [
    0x43, 0x8b, 0x39, 0x66, 0xc6, 0xfb, 0x36, 0x29,
    0x94, 0x9c, 0x4f, 0xd7, 0x13, 0x33, 0x41, 0x77,
    0xcc, 0x15, 0x1d, 0xfe, 0x49, 0xac, 0x8b, 0xa2,
    0x29, 0x9b, 0x27, 0x2e, 0x33, 0x3c, 0x02, 0xeb,
];
/// Project verification link list
pub const NYX_VERIFIED_PROJECT_VERIFICATION_LINKS: [u8; 32] = [
    0x6c, 0x17, 0x18, 0x52, 0x5d, 0x90, 0x2c, 0x3f,
    0xbc, 0x20, 0xec, 0xfb, 0x12, 0x09, 0xac, 0xee,
    0x0f, 0xb7, 0x62, 0xf9, 0xb0, 0xc0, 0xb2, 0xf6,
    0xd1, 0x81, 0x4c, 0x46, 0x27, 0x90, 0x91, 0x10,
];

/// List keys of the five verified project attributes
pub const PROJECT_LIST_KEYS: [[u8; 32]; 5] = [
    NYX_VERIFIED_PROJECT_NAMES,
    NYX_VERIFIED_PROJECT_LINKS,
    NYX_VERIFIED_PROJECT_UNITS,
    NYX_VERIFIED_PROJECT_GEOGRAPHIC_IDENTIFIERS,
    NYX_VERIFIED_PROJECT_VERIFICATION_LINKS,
];

pub fn key(env: &Env, raw: &[u8; 32]) -> BytesN<32> {
    BytesN::from_array(env, raw)
}

/// Key of element `index` in an array stored under `list`: the first 16
/// bytes of the list key followed by the index as a big-endian u128.
pub fn element_key(env: &Env, list: &[u8; 32], index: u32) -> BytesN<32> {
    let mut raw = [0u8; 32];
    raw[..16].copy_from_slice(&list[..16]);
    raw[16..].copy_from_slice(&u128::from(index).to_be_bytes());
    BytesN::from_array(env, &raw)
}

/// Returns the project list key matching `candidate`, if any
pub fn project_list_key(candidate: &BytesN<32>) -> Option<[u8; 32]> {
    let raw = candidate.to_array();
    PROJECT_LIST_KEYS.iter().copied().find(|list| *list == raw)
}
