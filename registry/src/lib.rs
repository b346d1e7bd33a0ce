//! Allowlist registry and access control.
//!
//! Two append-only membership sets gate the protocol:
//! - **Algorithms**: which scoring algorithm versions a submission may cite.
//! - **Verifiers**: which identities may dispute a record.
//!
//! Only the administrator may append to either set. There is no removal path;
//! once approved, an algorithm or verifier stays approved.

pub mod access;
pub mod allowlist;
pub mod error;
pub mod registry;

pub use access::AdminGate;
pub use allowlist::{Allowlist, MemoryAllowlist};
pub use error::RegistryError;
pub use registry::Registry;
