//! Participant identity: claimants, verifiers, reward recipients, the administrator.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque participant identity.
///
/// Identities are compared by content. Anything that authenticates a caller
/// (signatures, sessions) happens before an `Identity` reaches the protocol.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Upper bound on identity length, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Wrap a raw string without validation.
    ///
    /// Use [`Identity::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an identity from untrusted input.
    ///
    /// Rejects empty strings, strings longer than [`Identity::MAX_LEN`], and
    /// strings containing whitespace or control characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypeError::InvalidIdentity("empty".into()));
        }
        if s.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidIdentity(format!(
                "{} bytes exceeds maximum of {}",
                s.len(),
                Self::MAX_LEN
            )));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidIdentity(format!(
                "{s:?} contains whitespace or control characters"
            )));
        }
        Ok(Self(s))
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
