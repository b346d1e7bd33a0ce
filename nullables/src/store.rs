//! Nullable store: in-memory record storage with injectable write failures.

use attest_store::{AttestationRecord, AttestationStore, MemoryStore, StoreError};
use attest_types::Identity;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

const DISARMED: u64 = u64::MAX;

/// Wraps [`MemoryStore`]; while `fail_writes` is set every put and delete
/// fails with a backend error and leaves the contents untouched.
pub struct NullStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    /// Writes still allowed before `fail_writes` switches on.
    writes_until_failure: AtomicU64,
}

impl Default for NullStore {
    fn default() -> Self {
        Self {
            inner: MemoryStore::default(),
            fail_writes: AtomicBool::new(false),
            writes_until_failure: AtomicU64::new(DISARMED),
        }
    }
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.writes_until_failure.store(DISARMED, Ordering::SeqCst);
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Let the next `n` writes succeed, then fail every write after them.
    pub fn fail_writes_after(&self, n: u64) {
        self.fail_writes.store(n == 0, Ordering::SeqCst);
        self.writes_until_failure
            .store(if n == 0 { DISARMED } else { n }, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        let left = self.writes_until_failure.load(Ordering::SeqCst);
        if left != DISARMED {
            if left <= 1 {
                self.writes_until_failure.store(DISARMED, Ordering::SeqCst);
                self.fail_writes.store(true, Ordering::SeqCst);
            } else {
                self.writes_until_failure.store(left - 1, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

impl AttestationStore for NullStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<AttestationRecord>, StoreError> {
        self.inner.get_record(identity)
    }

    fn put_record(
        &self,
        identity: &Identity,
        record: &AttestationRecord,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner.put_record(identity, record)
    }

    fn delete_record(
        &self,
        identity: &Identity,
    ) -> Result<Option<AttestationRecord>, StoreError> {
        self.check_writable()?;
        self.inner.delete_record(identity)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        self.inner.record_count()
    }

    fn outstanding_count(&self) -> Result<u64, StoreError> {
        self.inner.outstanding_count()
    }
}
