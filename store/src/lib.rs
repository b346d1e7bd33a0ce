//! Storage for attestation records.
//!
//! Every backend implements [`AttestationStore`]. The state machine depends
//! only on the trait; [`MemoryStore`] is the default backend.

pub mod error;
pub mod memory;
pub mod record;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{AttestationRecord, AttestationStore, RecordState};
