//! Facts emitted by successful operations.

use attest_types::{AlgorithmRef, Identity, Score, StakeAmount, Timestamp};
use serde::{Deserialize, Serialize};

/// An immutable fact produced by a successful operation.
///
/// Rejected operations emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttestationEvent {
    /// A record was created; its challenge window is open.
    Submitted {
        identity: Identity,
        score: Score,
        algorithm: AlgorithmRef,
        observed_at: Timestamp,
    },
    /// A record was invalidated and its bond redirected.
    Disputed {
        claimant: Identity,
        verifier: Identity,
        original_score: Score,
        asserted_score: u64,
        algorithm: AlgorithmRef,
    },
    /// A bond was returned to its claimant.
    Withdrawn {
        identity: Identity,
        amount: StakeAmount,
    },
    AlgorithmApproved {
        algorithm: AlgorithmRef,
    },
    VerifierApproved {
        verifier: Identity,
    },
    AdminTransferred {
        previous: Identity,
        new: Identity,
    },
}

impl AttestationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::Disputed { .. } => "disputed",
            Self::Withdrawn { .. } => "withdrawn",
            Self::AlgorithmApproved { .. } => "algorithm_approved",
            Self::VerifierApproved { .. } => "verifier_approved",
            Self::AdminTransferred { .. } => "admin_transferred",
        }
    }
}
