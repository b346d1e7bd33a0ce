//! Fixed protocol constants exposed for integration.
//!
//! Neither value is governable: the challenge window and the bond are the same
//! for every record for the lifetime of a deployment.

use crate::amount::StakeAmount;

/// Raw units in one whole unit of bondable value.
pub const STAKE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Bond every claimant must post with a submission: 0.01 of a whole unit.
pub const REQUIRED_STAKE: StakeAmount = StakeAmount::new(STAKE_UNIT / 100);

/// Duration of the challenge window in seconds (one day).
///
/// A record submitted at `t` finalizes at exactly `t + CHALLENGE_WINDOW_SECS`.
pub const CHALLENGE_WINDOW_SECS: u64 = 86_400;
