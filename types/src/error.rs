//! Errors raised while parsing fundamental types from untrusted input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid algorithm reference: {0}")]
    InvalidAlgorithmRef(String),

    #[error("score {given} outside [{min}, {max}]")]
    ScoreOutOfRange { min: u8, max: u8, given: u64 },
}
