//! Stake-accounting errors.

use thiserror::Error;

/// A fund movement the ledger refused to perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error("insufficient pooled bonds: need {needed}, pooled {available}")]
    InsufficientPool { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in ledger")]
    Overflow,

    #[error("transfer to {recipient} rejected: {reason}")]
    Rejected { recipient: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakeError {
    #[error("incorrect stake: expected {expected}, given {given}")]
    IncorrectStake { expected: u128, given: u128 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
