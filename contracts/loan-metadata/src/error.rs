use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// No value stored under the given token id and key
    DataNotFound = 1,

    /// Stored value is of a different type than the one requested
    DecodeMismatch = 2,

    /// Raw bytes are too long for the requested integer type
    InvalidDataLength = 3,

    /// Raw bytes are not valid UTF-8
    InvalidUtf8 = 4,

    /// Token id has not been minted
    TokenNotFound = 5,

    /// Control has already been handed to a controller
    ControlAlreadyTransferred = 6,

    /// Store is still pending and refuses writes
    NotActive = 7,

    /// Keys and values passed to a batch write differ in length
    LengthMismatch = 8,

    /// Arithmetic overflow or underflow occurred
    ArithmeticError = 9,
}
