//! Algorithm reference: names the scoring procedure version behind a score.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an approved scoring algorithm version (typically a content
/// identifier such as an IPFS CID).
///
/// Equality is byte-for-byte content equality of the underlying string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmRef(String);

impl AlgorithmRef {
    pub const MAX_LEN: usize = 256;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an algorithm reference from untrusted input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypeError::InvalidAlgorithmRef("empty".into()));
        }
        if s.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidAlgorithmRef(format!(
                "{} bytes exceeds maximum of {}",
                s.len(),
                Self::MAX_LEN
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlgorithmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlgorithmRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
