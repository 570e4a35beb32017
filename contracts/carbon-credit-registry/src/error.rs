use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// No record with the given id
    RecordNotFound = 1,

    /// Control has already been handed to a controller
    ControlAlreadyTransferred = 2,

    /// Registry is still pending and refuses mints
    NotActive = 3,

    /// Units must be greater than zero
    ValueNotPositive = 4,

    /// Arithmetic overflow or underflow occurred
    ArithmeticError = 5,
}
