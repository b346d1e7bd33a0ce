//! In-memory record store.

use crate::record::{AttestationRecord, AttestationStore};
use crate::StoreError;
use attest_types::Identity;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A thread-safe in-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Identity, AttestationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<Identity, AttestationRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl AttestationStore for MemoryStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<AttestationRecord>, StoreError> {
        Ok(self.records()?.get(identity).cloned())
    }

    fn put_record(
        &self,
        identity: &Identity,
        record: &AttestationRecord,
    ) -> Result<(), StoreError> {
        self.records()?.insert(identity.clone(), record.clone());
        Ok(())
    }

    fn delete_record(
        &self,
        identity: &Identity,
    ) -> Result<Option<AttestationRecord>, StoreError> {
        Ok(self.records()?.remove(identity))
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.records()?.len() as u64)
    }

    fn outstanding_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .records()?
            .values()
            .filter(|r| r.is_outstanding())
            .count() as u64)
    }
}
