//! Append-only membership sets.

use std::collections::HashSet;
use std::hash::Hash;

/// An append-only set. Implementations must never drop a member once added.
pub trait Allowlist<T>: Send {
    /// Add `item`. Returns `false` if it was already a member.
    fn add(&mut self, item: T) -> bool;

    fn contains(&self, item: &T) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `HashSet`-backed allowlist.
#[derive(Clone, Debug)]
pub struct MemoryAllowlist<T> {
    members: HashSet<T>,
}

impl<T> MemoryAllowlist<T> {
    pub fn new() -> Self {
        Self {
            members: HashSet::new(),
        }
    }
}

impl<T> Default for MemoryAllowlist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> FromIterator<T> for MemoryAllowlist<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash + Send> Allowlist<T> for MemoryAllowlist<T> {
    fn add(&mut self, item: T) -> bool {
        self.members.insert(item)
    }

    fn contains(&self, item: &T) -> bool {
        self.members.contains(item)
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}
