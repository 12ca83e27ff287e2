use crate::domain::ports::{OracleError, TransferError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("Employee not found")]
    EmployeeNotFound,
    #[error("An employee already exists for this address")]
    EmployeeAlreadyExists,
    #[error("Employee is no longer active")]
    NonActiveEmployee,
    #[error("Address must not be empty")]
    NullAddress,
    #[error("Termination date is in the past")]
    PastTerminationDate,
    #[error("Caller does not match an employee")]
    EmployeeDoesNotMatch,

    #[error("Assets and percentages have different lengths")]
    TokenAllocationMismatch,
    #[error("Asset is not allowed for settlement")]
    NoAllowedToken,
    #[error("Allocation percentages must add up to 100")]
    DistributionIncomplete,
    #[error("Maximum number of allowed assets reached")]
    MaxAllowedTokensReached,

    #[error("Nothing to pay")]
    NothingPaid,
    #[error("Requested amount exceeds the available balance")]
    InvalidRequestedAmount,
    #[error("Exchange rate is stale or zero")]
    ExchangeRateStale,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Rate expiry time is too short")]
    ExpiryTimeTooShort,
    #[error("Settlement target is not usable: {0}")]
    InvalidSettlementTarget(String),

    #[error("Settlement failed: {0}")]
    SettlementFailed(#[from] TransferError),
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
    #[error("Storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for PayrollError {
    fn from(err: serde_json::Error) -> Self {
        PayrollError::Storage(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PayrollError {
    fn from(err: rocksdb::Error) -> Self {
        PayrollError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PayrollError>;
