//! Attestation score: an integer in `[Score::MIN, Score::MAX]`.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Validate a raw score.
    pub fn new(raw: u64) -> Result<Self, TypeError> {
        if raw > u64::from(Self::MAX) {
            return Err(TypeError::ScoreOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                given: raw,
            });
        }
        // raw <= 100 here, so the narrowing is lossless.
        Ok(Self(raw as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether `other` (an unvalidated asserted score) equals this score.
    pub fn matches(&self, other: u64) -> bool {
        u64::from(self.0) == other
    }
}

impl TryFrom<u64> for Score {
    type Error = TypeError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Score> for u64 {
    fn from(score: Score) -> Self {
        u64::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
