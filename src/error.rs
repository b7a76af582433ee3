//! Error types for order creation, cancellation, settlement and fee
//! administration.
//!
//! Every failure aborts the operation that raised it without side effects.
//! [`Error::kind`] groups the variants by how a caller should react.

use alloy_primitives::U256;
use thiserror::Error;

use crate::env::{LedgerError, RouterError};
use crate::registry::RegistryError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; retrying with the same input fails again
    Validation,
    /// The caller's view of order state is stale; re-query before retrying
    StateConflict,
    /// Environment-dependent; may succeed later or with other parameters
    Execution,
    /// Rejected administrative input
    Administrative,
    /// A batch made no progress at all
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // --- validation -------------------------------------------------------
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid maker")]
    InvalidMaker,

    #[error("invalid source token")]
    InvalidSourceToken,

    #[error("invalid destination token")]
    InvalidDestinationToken,

    #[error("source and destination tokens are the same")]
    DuplicateTokens,

    #[error("invalid amount in")]
    InvalidAmountIn,

    #[error("invalid minimum amount out")]
    InvalidAmountOutMin,

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("invalid deadline")]
    InvalidDeadline,

    #[error("order already exists")]
    OrderExists,

    #[error("swap path must start at the source token and end at the destination token")]
    InvalidPath,

    #[error("fill amount must be positive")]
    InvalidFillAmount,

    // --- state conflicts --------------------------------------------------
    #[error("order not found")]
    OrderNotFound,

    #[error("caller is not the maker")]
    NotMaker,

    #[error("order already canceled")]
    AlreadyCanceled,

    #[error("order canceled")]
    OrderCanceled,

    #[error("order already filled")]
    AlreadyFilled,

    #[error("order expired")]
    OrderExpired,

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),

    // --- execution --------------------------------------------------------
    #[error("called by contract")]
    CalledByContract,

    #[error("insufficient amount out: expected at least {expected}, got {actual}")]
    InsufficientAmountOut { expected: U256, actual: U256 },

    #[error("transfer failed: {0}")]
    TransferFailed(LedgerError),

    #[error("swap failed: {0}")]
    SwapFailed(RouterError),

    #[error("arithmetic overflow")]
    Overflow,

    // --- administration ---------------------------------------------------
    #[error("caller is not the owner")]
    Unauthorized,

    #[error("fee too high")]
    FeeTooHigh,

    #[error("fee split too high")]
    FeeSplitTooHigh,

    // --- batch ------------------------------------------------------------
    #[error("no order filled")]
    NoOrderFilled,
}

impl Error {
    /// The category of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSignature
            | Error::InvalidMaker
            | Error::InvalidSourceToken
            | Error::InvalidDestinationToken
            | Error::DuplicateTokens
            | Error::InvalidAmountIn
            | Error::InvalidAmountOutMin
            | Error::InvalidRecipient
            | Error::InvalidDeadline
            | Error::OrderExists
            | Error::InvalidPath
            | Error::InvalidFillAmount => ErrorKind::Validation,

            Error::OrderNotFound
            | Error::NotMaker
            | Error::AlreadyCanceled
            | Error::OrderCanceled
            | Error::AlreadyFilled
            | Error::OrderExpired
            | Error::Registry(_) => ErrorKind::StateConflict,

            Error::CalledByContract
            | Error::InsufficientAmountOut { .. }
            | Error::TransferFailed(_)
            | Error::SwapFailed(_)
            | Error::Overflow => ErrorKind::Execution,

            Error::Unauthorized | Error::FeeTooHigh | Error::FeeSplitTooHigh => {
                ErrorKind::Administrative
            }

            Error::NoOrderFilled => ErrorKind::Batch,
        }
    }
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        Error::TransferFailed(err)
    }
}

impl From<RouterError> for Error {
    fn from(err: RouterError) -> Self {
        Error::SwapFailed(err)
    }
}
