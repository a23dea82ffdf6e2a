//! MemTable implementation
//!
//! BTreeMap-based memtable with RwLock for concurrency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::TableEntry;

/// In-memory table for recent writes
pub struct MemTable {
    /// Ordered key → entry map (many readers, one writer)
    data: RwLock<BTreeMap<Vec<u8>, TableEntry>>,

    /// Approximate size of all keys and values, in bytes
    bytes: AtomicUsize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            bytes: AtomicUsize::new(0),
        }
    }

    /// Get the entry for a key (read lock)
    ///
    /// `Some(Tombstone)` means the key was deleted more recently than any
    /// table file may claim — callers must not fall through to disk.
    pub fn get(&self, key: &[u8]) -> Option<TableEntry> {
        self.data.read().get(key).cloned()
    }

    /// Insert a key-value pair; returns the new approximate size in bytes
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) -> usize {
        let key_len = key.len();
        let added = key_len + value.len();
        let mut data = self.data.write();
        let removed = replaced_bytes(key_len, data.insert(key, TableEntry::Value(value)));
        self.adjust(added, removed)
    }

    /// Insert a tombstone for a key; returns the new approximate size
    pub fn delete(&self, key: Vec<u8>) -> usize {
        let key_len = key.len();
        let mut data = self.data.write();
        let removed = replaced_bytes(key_len, data.insert(key, TableEntry::Tombstone));
        self.adjust(key_len, removed)
    }

    /// Approximate size of the table in bytes
    pub fn size(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Number of entries (live values and tombstones)
    pub fn entry_count(&self) -> usize {
        self.data.read().len()
    }

    /// True when the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Snapshot all entries in sorted key order (for flushing to disk)
    pub fn entries(&self) -> Vec<(Vec<u8>, TableEntry)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove all entries (after a successful flush)
    pub fn clear(&self) {
        self.data.write().clear();
        self.bytes.store(0, Ordering::Relaxed);
    }

    /// Apply a size delta for an insert that replaced `removed` bytes.
    /// Called with the write lock held, so load/store does not race.
    fn adjust(&self, added: usize, removed: usize) -> usize {
        let size = self
            .bytes
            .load(Ordering::Relaxed)
            .saturating_sub(removed)
            + added;
        self.bytes.store(size, Ordering::Relaxed);
        size
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Approximate byte cost of a replaced entry, key bytes included
/// (0 when nothing was replaced, so the new key is charged exactly once)
fn replaced_bytes(key_len: usize, entry: Option<TableEntry>) -> usize {
    match entry {
        Some(TableEntry::Value(v)) => key_len + v.len(),
        Some(TableEntry::Tombstone) => key_len,
        None => 0,
    }
}
