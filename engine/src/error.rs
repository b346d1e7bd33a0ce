use attest_registry::RegistryError;
use attest_stake::{LedgerError, StakeError};
use attest_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Why a dispute was rejected as invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisputeRejection {
    /// The claimant has no record.
    NoRecord,
    /// The cited algorithm differs from the one stored on the record.
    AlgorithmMismatch { stored: String, given: String },
    /// The asserted score equals the recorded score; there is nothing to dispute.
    ScoreMatches(u64),
}

impl fmt::Display for DisputeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecord => write!(f, "claimant has no record"),
            Self::AlgorithmMismatch { stored, given } => {
                write!(f, "record cites algorithm {stored}, dispute cites {given}")
            }
            Self::ScoreMatches(score) => write!(f, "asserted score {score} equals recorded score"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestationError {
    #[error("invalid score: {given} outside [{min}, {max}]")]
    InvalidScore { min: u8, max: u8, given: u64 },

    #[error("algorithm {0} is not approved")]
    InvalidAlgorithm(String),

    #[error("{0} already has an outstanding record")]
    OutstandingRecord(String),

    #[error("incorrect stake: expected {expected}, given {given}")]
    IncorrectStake { expected: u128, given: u128 },

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] RegistryError),

    #[error("invalid dispute: {0}")]
    InvalidDispute(DisputeRejection),

    #[error("dispute denied: record of {0} is already settled")]
    DisputeDenied(String),

    #[error("nothing to withdraw for {0}")]
    InvalidWithdraw(String),

    #[error("withdraw not ready: {} remaining", attest_utils::format_duration(*remaining_secs))]
    WithdrawNotReady { remaining_secs: u64 },

    #[error("finalization time overflows the clock")]
    ClockOverflow,

    #[error("bond transfer failed: {0}")]
    Transfer(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AttestationError {
    /// Stable machine-readable name of the rejection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidScore { .. } => "invalid_score",
            Self::InvalidAlgorithm(_) => "invalid_algorithm",
            Self::OutstandingRecord(_) => "outstanding_record",
            Self::IncorrectStake { .. } => "incorrect_stake",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidDispute(_) => "invalid_dispute",
            Self::DisputeDenied(_) => "dispute_denied",
            Self::InvalidWithdraw(_) => "invalid_withdraw",
            Self::WithdrawNotReady { .. } => "withdraw_not_ready",
            Self::ClockOverflow => "clock_overflow",
            Self::Transfer(_) => "transfer_failed",
            Self::Store(_) => "store_error",
        }
    }
}

impl From<StakeError> for AttestationError {
    fn from(e: StakeError) -> Self {
        match e {
            StakeError::IncorrectStake { expected, given } => {
                Self::IncorrectStake { expected, given }
            }
            StakeError::Ledger(inner) => Self::Transfer(inner),
        }
    }
}
