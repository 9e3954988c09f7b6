//! In-memory duplicate index backed by a sharded concurrent map.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use super::{DuplicateIndex, DuplicateKey, KeyDisposition};
use crate::error::IndexError;

/// Duplicate index holding keys in process memory.
///
/// The map's entry API holds the shard lock across lookup and insert,
/// which gives the atomicity the [`DuplicateIndex`] contract requires.
/// The index grows monotonically; keys are never removed within a run.
/// Lifetime is up to the caller: one instance per batch gives per-batch
/// protection, a longer-lived instance extends it across batches.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: DashMap<DuplicateKey, DateTime<Utc>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DuplicateIndex for InMemoryIndex {
    fn check_and_insert(
        &self,
        key: &DuplicateKey,
        seen_at: DateTime<Utc>,
    ) -> Result<KeyDisposition, IndexError> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(_) => {
                trace!(key = %key.as_composite(), "duplicate key hit");
                Ok(KeyDisposition::Seen)
            }
            Entry::Vacant(slot) => {
                slot.insert(seen_at);
                Ok(KeyDisposition::New)
            }
        }
    }
}
