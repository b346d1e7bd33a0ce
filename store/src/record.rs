//! Attestation record and its storage trait.

use crate::StoreError;
use attest_types::{AlgorithmRef, Identity, Score, Timestamp};
use serde::{Deserialize, Serialize};

/// A claimant's posted score, its algorithm, and its challenge deadline.
///
/// Presence is expressed by `Option<AttestationRecord>` at the store boundary;
/// a stored record always exists, whatever its timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub score: Score,
    pub algorithm: AlgorithmRef,
    /// When the record was accepted.
    pub submitted_at: Timestamp,
    /// Observation time supplied by the scoring client.
    pub observed_at: Timestamp,
    /// Exactly `submitted_at + CHALLENGE_WINDOW_SECS`.
    pub finalization_time: Timestamp,
    /// Set once the bond has been withdrawn.
    pub settled: bool,
}

impl AttestationRecord {
    /// Whether this record still has a bond escrowed against it.
    pub fn is_outstanding(&self) -> bool {
        !self.settled
    }

    /// Whether the challenge window has closed at `now`.
    pub fn is_finalized(&self, now: Timestamp) -> bool {
        self.finalization_time.has_passed(now)
    }
}

/// Lifecycle position of an identity.
///
/// A disputed record is deleted, so a disputed identity reads as `Absent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Absent,
    Pending,
    Settled,
}

impl RecordState {
    pub fn of(record: Option<&AttestationRecord>) -> Self {
        match record {
            None => Self::Absent,
            Some(r) if r.settled => Self::Settled,
            Some(_) => Self::Pending,
        }
    }
}

/// Trait for attestation record storage, keyed by claimant identity.
pub trait AttestationStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<AttestationRecord>, StoreError>;

    /// Insert or overwrite the record for `identity`.
    fn put_record(&self, identity: &Identity, record: &AttestationRecord)
        -> Result<(), StoreError>;

    /// Remove the record for `identity`, returning what was stored.
    fn delete_record(&self, identity: &Identity)
        -> Result<Option<AttestationRecord>, StoreError>;

    fn record_count(&self) -> Result<u64, StoreError>;

    /// Number of records with a bond still escrowed.
    fn outstanding_count(&self) -> Result<u64, StoreError>;
}
