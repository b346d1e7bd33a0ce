//! Fundamental types for the attestation protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, bond amounts, timestamps, scores, algorithm references, and the
//! fixed protocol constants.

pub mod algorithm;
pub mod amount;
pub mod error;
pub mod identity;
pub mod params;
pub mod score;
pub mod time;

pub use algorithm::AlgorithmRef;
pub use amount::StakeAmount;
pub use error::TypeError;
pub use identity::Identity;
pub use params::{CHALLENGE_WINDOW_SECS, REQUIRED_STAKE, STAKE_UNIT};
pub use score::Score;
pub use time::{Clock, SystemClock, Timestamp};
