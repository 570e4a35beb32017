use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller does not hold the role the action requires
    Unauthorized = 1,

    /// Loan is not in a state that permits the action
    ActionNotAllowedInCurrentState = 2,

    /// Next scheduled payment is not due yet
    PaymentNotDue = 3,

    /// Loan is taken but nothing is left to repay
    ZeroBalanceOnLoan = 4,

    /// Contract has not been activated
    NotActivated = 5,

    /// Metadata store or credit registry has not handed control to this contract
    ControllerNotTransferred = 6,

    /// Already activated
    AlreadyActivated = 7,

    /// Principal, term or fee of a new loan is out of range
    InvalidLoanTerms = 8,

    /// No borrower has been assigned to the loan
    BorrowerNotSet = 9,

    /// No payment schedule has been set for the loan
    PaymentScheduleNotSet = 10,

    /// Schedule is empty or not in chronological order
    InvalidPaymentSchedule = 11,

    /// No verified project at the given index
    ProjectNotFound = 12,

    /// Key is not one of the verified project list keys
    InvalidMetadataKey = 13,

    /// Value type does not match the project attribute
    InvalidMetadataValue = 14,

    /// No loan with the given token id
    LoanNotFound = 15,

    /// Stored loan field cannot be interpreted
    CorruptLoanData = 16,

    /// Settlement asset transfer failed
    TransferFailed = 17,

    /// Arithmetic overflow or underflow occurred
    ArithmeticError = 18,

    /// Value must be greater than or equal to 0
    ValueNotPositive = 19,
}
