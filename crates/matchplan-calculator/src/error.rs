//! Error handling for the allocation engine
//!
//! Every failure is local to one request: the engine is pure, so a rejected call
//! leaves nothing behind and retrying it with the same inputs fails the same way.

use matchplan_types::{ParseStrategyError, SeriesError};
use thiserror::Error;

/// Result alias used throughout the calculator.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Error type for allocation and reconciliation requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// A rate, limit or series shape outside its allowed range
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: &'static str, message: String },

    /// A paycheck amount that cannot be divided by or is negative
    #[error("Invalid paycheck amount at index {index}: {amount_cents} cents")]
    InvalidPaycheckAmount { index: usize, amount_cents: i64 },

    /// Strategy identifier that is not uniform, frontload or dca
    #[error(transparent)]
    UnknownStrategy(#[from] ParseStrategyError),

    /// An intermediate sum left the i64 range
    #[error("Arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },
}

impl AllocationError {
    /// Shorthand for [`AllocationError::InvalidParameter`].
    pub fn invalid_parameter(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter { parameter, message: message.into() }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } | Self::UnknownStrategy(_) => "invalid_parameter",
            Self::InvalidPaycheckAmount { .. } => "invalid_paycheck_amount",
            Self::Overflow { .. } => "overflow",
        }
    }
}

impl From<SeriesError> for AllocationError {
    fn from(err: SeriesError) -> Self {
        Self::invalid_parameter("paychecks", err.to_string())
    }
}
