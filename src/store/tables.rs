//! Table Set
//!
//! Manages the collection of immutable table files on disk.
//!
//! ## Responsibilities
//! - Discover existing table files on startup
//! - Search tables newest → oldest for point reads
//! - Create new tables from memtable flushes
//! - Overlay all tables oldest → newest for full scans

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Result;
use crate::memtable::{MemTable, TableEntry};
use crate::sstable::{TableBuilder, TableReader};

/// The set of on-disk tables, newest first
pub(crate) struct TableSet {
    /// Directory where table files live
    dir: PathBuf,

    /// Open readers, ordered newest → oldest
    tables: RwLock<Vec<TableReader>>,

    /// ID for the next table file (atomic, lock-free)
    next_id: AtomicU64,
}

impl TableSet {
    /// Open or create the table directory and load existing tables
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let mut ids: Vec<u64> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                if let Some(id) = parse_table_id(&path) {
                    ids.push(id);
                }
            }
        }

        // Newest (highest ID) first
        ids.sort_unstable();
        ids.reverse();

        let mut tables = Vec::with_capacity(ids.len());
        for &id in &ids {
            tables.push(TableReader::open(&table_path(dir, id))?);
        }

        let next_id = ids.first().map(|&id| id + 1).unwrap_or(1);

        Ok(Self {
            dir: dir.to_path_buf(),
            tables: RwLock::new(tables),
            next_id: AtomicU64::new(next_id),
        })
    }

    /// Look up a key across all tables, newest → oldest
    ///
    /// The first table that knows the key decides: a tombstone there means
    /// the key is deleted even if an older table still holds a value.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let tables = self.tables.read();

        for reader in tables.iter() {
            if !reader.might_contain(key) {
                continue;
            }
            match reader.get(key)? {
                Some(TableEntry::Value(v)) => return Ok(Some(v)),
                Some(TableEntry::Tombstone) => return Ok(None),
                None => continue,
            }
        }

        Ok(None)
    }

    /// Flush a memtable into a new table file and register it as newest
    pub fn flush(&self, memtable: &MemTable) -> Result<()> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let path = table_path(&self.dir, id);

        let mut builder = TableBuilder::new(&path)?;
        for (key, entry) in memtable.entries() {
            builder.add(&key, &entry)?;
        }
        builder.finish()?;

        let reader = TableReader::open(&path)?;
        self.tables.write().insert(0, reader);

        Ok(())
    }

    /// Overlay every table, oldest → newest, into `map`
    ///
    /// Newer entries overwrite older ones; tombstones are kept as `None`
    /// so the caller can let the memtable overlay on top before dropping
    /// deleted keys.
    pub fn scan_into(&self, map: &mut BTreeMap<Vec<u8>, Option<Vec<u8>>>) -> Result<()> {
        let tables = self.tables.read();

        for reader in tables.iter().rev() {
            for (key, value) in reader.entries()? {
                map.insert(key, value);
            }
        }

        Ok(())
    }

    /// Number of open tables
    pub fn count(&self) -> usize {
        self.tables.read().len()
    }
}

/// File path for a table with the given ID
fn table_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("table_{:06}.hst", id))
}

/// Parse a table ID from a filename: "table_000042.hst" → Some(42)
fn parse_table_id(path: &Path) -> Option<u64> {
    if path.extension()?.to_str()? != "hst" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("table_")?.parse().ok()
}
