//! Stake accounting for attestation bonds.
//!
//! Every live record is backed by exactly one bond of a fixed size. This crate
//! handles:
//! - Enforcing the exact bond amount on submission
//! - Collecting the bond from the claimant into the pool
//! - Releasing a bond from the pool (refund to the claimant, or forfeit to a
//!   dispute's reward recipient)
//!
//! Balances live behind the [`BondLedger`] trait so the state machine can be
//! wired to any custody backend.

pub mod error;
pub mod escrow;
pub mod ledger;

pub use error::{LedgerError, StakeError};
pub use escrow::BondEscrow;
pub use ledger::{BondLedger, InMemoryLedger};
