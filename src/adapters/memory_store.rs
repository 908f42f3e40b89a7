//! In-memory archive adapter.
//!
//! Keeps every snapshot in a map keyed like the real store.  Used by tests
//! and as the fallback when the archive directory is unusable, in which
//! case snapshots live only as long as the process.

use std::collections::BTreeMap;

use crate::app::ports::{ArchivePort, StoreError};
use crate::archive::ArchiveSnapshot;

#[derive(Debug, Default)]
pub struct MemoryArchive {
    records: BTreeMap<String, Vec<ArchiveSnapshot>>,
    /// Upper bound on stored records; `None` = unbounded.
    capacity: Option<usize>,
    len: usize,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse new records once `capacity` are stored.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> &[ArchiveSnapshot] {
        self.records.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ArchivePort for MemoryArchive {
    fn put(&mut self, key: &str, record: &ArchiveSnapshot) -> Result<(), StoreError> {
        if self.capacity.is_some_and(|cap| self.len >= cap) {
            return Err(StoreError::Unavailable);
        }
        self.records
            .entry(key.to_string())
            .or_default()
            .push(record.clone());
        self.len += 1;
        Ok(())
    }
}
