//! Append-only log of emitted facts, with live subscription.

use attest_engine::AttestationEvent;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// A fact together with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Zero-based, gap-free position in the log.
    pub seq: u64,
    #[serde(flatten)]
    pub event: AttestationEvent,
}

/// Append-only event log.
///
/// Entries are never modified or removed. Subscribers (e.g. a verifier daemon
/// watching for `Submitted`) receive each entry as it is appended; a
/// subscriber that lags past the channel capacity can catch up with
/// [`EventLog::since`].
pub struct EventLog {
    entries: RwLock<Vec<SequencedEvent>>,
    tx: broadcast::Sender<SequencedEvent>,
}

impl EventLog {
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            entries: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Append a fact and return its sequence number.
    pub fn append(&self, event: AttestationEvent) -> u64 {
        // Pushes are atomic, so a poisoned lock still guards a consistent log.
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let seq = entries.len() as u64;
        let entry = SequencedEvent { seq, event };
        entries.push(entry.clone());
        // No subscribers is fine.
        let _ = self.tx.send(entry);
        seq
    }

    /// Up to `limit` entries starting at sequence number `from`.
    pub fn since(&self, from: u64, limit: usize) -> Vec<SequencedEvent> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(entries.len());
        entries[start..].iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> u64 {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SequencedEvent> {
        self.tx.subscribe()
    }
}
