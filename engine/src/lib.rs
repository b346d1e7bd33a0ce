//! Attestation lifecycle state machine.
//!
//! Per identity: `Absent → Pending → {Disputed (→ Absent), Settled}`, and
//! `Settled → Pending` again on a fresh submission.
//!
//! Three operations drive it:
//! 1. **submit**: post a score with the exact bond; opens the challenge window.
//! 2. **dispute**: an approved verifier asserts a different score; the record
//!    is deleted and the bond goes to the reward recipient.
//! 3. **withdraw**: after the window closes, the claimant reclaims the bond and
//!    the record is kept as settled.
//!
//! Every operation is all-or-nothing: a rejected precondition changes nothing,
//! and a failed bond movement rolls back the record mutation it was paired with.

pub mod engine;
pub mod error;
pub mod event;

pub use engine::AttestationEngine;
pub use error::{AttestationError, DisputeRejection};
pub use event::AttestationEvent;
